use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::workflows::candidates::{
    Address, CandidatePipeline, Email, Gender, Grade, Index, InterviewScores, JobName,
    KnownProgLang, Major, Name, Nric, Person, Phone, Race, School, SharedPipeline,
};

pub(super) fn nric(seed: u32) -> Nric {
    Nric::parse(&format!("S{seed:07}A")).expect("valid nric")
}

pub(super) fn job(name: &str) -> JobName {
    JobName::parse(name).expect("valid job name")
}

pub(super) fn index(one_based: usize) -> Index {
    Index::from_one_based(one_based).expect("non-zero index")
}

pub(super) fn person(name: &str, seed: u32) -> Person {
    Person {
        name: Name::parse(name).expect("valid name"),
        phone: Phone::parse(&format!("9{seed:07}")).expect("valid phone"),
        email: Email::parse(&format!("candidate{seed}@example.com")).expect("valid email"),
        nric: nric(seed),
        gender: Gender::parse("Female").expect("valid gender"),
        race: Race::parse("Chinese").expect("valid race"),
        address: Address::parse("10 Bishan St").expect("valid address"),
        school: School::parse("NUS").expect("valid school"),
        major: Major::parse("Computer Science").expect("valid major"),
        grade: Grade::new(4.0).expect("valid grade"),
        interview_scores: InterviewScores::new(vec![6, 8]).expect("valid scores"),
        known_prog_langs: BTreeSet::new(),
        past_jobs: BTreeSet::new(),
        jobs_applied: BTreeSet::new(),
        tags: BTreeSet::new(),
    }
}

pub(super) fn person_at(name: &str, seed: u32, address: &str) -> Person {
    Person {
        address: Address::parse(address).expect("valid address"),
        ..person(name, seed)
    }
}

pub(super) fn applicant_for(name: &str, seed: u32, jobs: &[&str]) -> Person {
    Person {
        jobs_applied: jobs.iter().map(|name| job(name)).collect(),
        ..person(name, seed)
    }
}

pub(super) fn with_language(mut person: Person, language: &str) -> Person {
    person
        .known_prog_langs
        .insert(KnownProgLang::parse(language).expect("valid language"));
    person
}

/// Pipeline holding `count` persons, all enrolled as applicants of `job_name`.
pub(super) fn pipeline_with_applicants(job_name: &str, count: u32) -> CandidatePipeline {
    let mut pipeline = CandidatePipeline::default();
    for seed in 1..=count {
        pipeline
            .add_person(applicant_for(&format!("Candidate {seed}"), seed, &[job_name]))
            .expect("add applicant");
    }
    pipeline
}

pub(super) fn shared(pipeline: CandidatePipeline) -> SharedPipeline {
    Arc::new(Mutex::new(pipeline))
}

pub(super) fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
