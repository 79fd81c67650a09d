use std::io::Cursor;

use hiring_pipeline::workflows::candidates::{
    CandidatePipeline, DuplicateRule, Index, JobName, MoveRequest, Nric, PersonFilter,
    PersonPatch, PersonPredicate, PipelineError, RosterImporter, School, Stage, TextField,
};

const ROSTER: &str = "\
Name,Phone,Email,NRIC,Gender,Race,Address,School,Major,Grade,Interview Scores,Languages,Past Jobs,Jobs Applied,Tags
Alex Yeoh,87438807,alexyeoh@example.com,S9671597H,Male,Chinese,311 Clementi Ave 2,NUS,Computer Science,4.5,\"7,8\",Rust;Python,,Engineer,
Bernice Yu,99272758,berniceyu@example.com,T0123456B,Female,Malay,10 Bishan St 22,NTU,Mathematics,3.9,6,Python,,Engineer;Analyst,
Charlotte Oliveiro,93210283,charlotte@example.com,S8812345C,Female,Eurasian,11 Ang Mo Kio Ave 3,SMU,Information Systems,4.1,9,Java,,Analyst,
";

fn loaded_pipeline() -> CandidatePipeline {
    let (state, summary) = RosterImporter::from_reader(Cursor::new(ROSTER), DuplicateRule::Identity)
        .expect("roster imports");
    assert_eq!(summary.imported, 3);
    CandidatePipeline::with_state(state)
}

fn job(name: &str) -> JobName {
    JobName::parse(name).expect("valid job name")
}

fn index(one_based: usize) -> Index {
    Index::from_one_based(one_based).expect("non-zero index")
}

fn nric(raw: &str) -> Nric {
    Nric::parse(raw).expect("valid nric")
}

#[test]
fn candidate_moves_through_every_stage_and_back() {
    let mut pipeline = loaded_pipeline();
    let engineer = job("Engineer");

    for (from, to) in [
        (Stage::Applicant, Stage::Kiv),
        (Stage::Kiv, Stage::Interview),
        (Stage::Interview, Stage::Shortlist),
    ] {
        pipeline
            .move_persons(MoveRequest {
                job: engineer.clone(),
                from,
                to,
                to_job: None,
                indices: vec![index(1)],
            })
            .expect("move succeeds");
    }

    let view = pipeline.get_job(&engineer).expect("job exists");
    assert_eq!(view.list(Stage::Shortlist)[0].name.as_str(), "Alex Yeoh");
    assert_eq!(view.list(Stage::Applicant).len(), 1);

    for _ in 0..3 {
        pipeline.undo().expect("undo succeeds");
    }
    assert_eq!(pipeline.undo(), Err(PipelineError::NoPriorState));

    let view = pipeline.get_job(&engineer).expect("job exists");
    assert_eq!(view.list(Stage::Applicant).len(), 2);
    assert!(view.list(Stage::Shortlist).is_empty());
}

#[test]
fn cross_job_move_rejects_candidates_already_in_the_destination() {
    let mut pipeline = loaded_pipeline();

    let outcome = pipeline
        .move_persons(MoveRequest {
            job: job("Engineer"),
            from: Stage::Applicant,
            to: Stage::Interview,
            to_job: Some(job("Analyst")),
            indices: vec![index(1), index(2)],
        })
        .expect("batch runs");

    let lists = pipeline
        .state()
        .jobs
        .lists_of(&job("Analyst"))
        .expect("analyst job");
    assert_eq!(lists.get(Stage::Interview), &[nric("S9671597H")]);
    let engineer = pipeline
        .state()
        .jobs
        .lists_of(&job("Engineer"))
        .expect("engineer job");
    assert_eq!(engineer.get(Stage::Applicant), &[nric("T0123456B")]);
    assert!(outcome.summary.starts_with("Moved 1 of 2"));
}

#[test]
fn editing_an_nric_keeps_job_membership() {
    let mut pipeline = loaded_pipeline();
    let patch = PersonPatch {
        nric: Some(nric("S7654321Z")),
        school: Some(School::parse("SUTD").expect("valid school")),
        ..PersonPatch::default()
    };

    pipeline.edit_person(index(1), patch).expect("edit succeeds");

    let engineer = pipeline
        .state()
        .jobs
        .lists_of(&job("Engineer"))
        .expect("engineer job");
    assert!(engineer.get(Stage::Applicant).contains(&nric("S7654321Z")));
    assert!(!engineer.get(Stage::Applicant).contains(&nric("S9671597H")));
}

#[test]
fn filtered_indices_drive_deletion() {
    let mut pipeline = loaded_pipeline();
    let filter = PersonFilter::default().and(
        PersonPredicate::keywords(TextField::Address, "ave").expect("valid keywords"),
    );

    let outcome = pipeline.set_filter(filter);
    assert_eq!(outcome.summary, "2 persons listed!");

    pipeline.delete_person(index(2)).expect("delete succeeds");

    assert_eq!(pipeline.state().persons.len(), 2);
    assert!(pipeline.state().persons.get(&nric("S8812345C")).is_none());
    let analyst = pipeline
        .state()
        .jobs
        .lists_of(&job("Analyst"))
        .expect("analyst job");
    assert_eq!(analyst.get(Stage::Applicant), &[nric("T0123456B")]);
}

#[test]
fn analytics_summarise_the_loaded_roster() {
    let pipeline = loaded_pipeline();

    let analytics = pipeline.analytics();

    assert_eq!(analytics.persons, 3);
    assert_eq!(analytics.jobs, 2);
    assert_eq!(analytics.stage_total(Stage::Applicant), 4);
    assert_eq!(analytics.mean_grade, Some(4.17));
    assert_eq!(analytics.languages.get("Python"), Some(&2));
}
