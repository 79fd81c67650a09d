use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Index, Nric, Person, PersonPatch};
use super::error::PipelineError;
use super::filter::PersonFilter;
use super::job::{JobName, Stage};
use super::service::{CandidatePipeline, CommandOutcome, DisplayMode, MoveRequest};

/// Pipeline shared by every request. Each request holds the lock until its command
/// has completed, so commands never interleave.
pub type SharedPipeline = Arc<Mutex<CandidatePipeline>>;

/// Router builder exposing the candidate pipeline as JSON endpoints.
pub fn pipeline_router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/api/v1/persons", get(list_persons).post(add_person))
        .route(
            "/api/v1/persons/:index",
            patch(edit_person).delete(delete_person),
        )
        .route("/api/v1/jobs", get(list_jobs))
        .route("/api/v1/jobs/:job", get(get_job))
        .route("/api/v1/jobs/:job/persons", post(add_person_to_job))
        .route("/api/v1/jobs/:job/moves", post(move_persons))
        .route("/api/v1/filter", put(set_filter).delete(clear_filter))
        .route("/api/v1/display", put(set_display))
        .route("/api/v1/history", get(history))
        .route("/api/v1/history/undo", post(undo))
        .route("/api/v1/history/redo", post(redo))
        .route("/api/v1/analytics", get(analytics))
        .with_state(pipeline)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrolRequest {
    nric: Nric,
    #[serde(default = "default_stage")]
    stage: Stage,
}

fn default_stage() -> Stage {
    Stage::Applicant
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveBody {
    from: Stage,
    to: Stage,
    #[serde(default)]
    to_job: Option<JobName>,
    indices: Vec<Index>,
}

fn lock(pipeline: &SharedPipeline) -> MutexGuard<'_, CandidatePipeline> {
    pipeline.lock().expect("pipeline mutex poisoned")
}

pub(crate) fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::DuplicateRecord { .. }
        | PipelineError::DuplicateInStage { .. }
        | PipelineError::NoPriorState
        | PipelineError::NoNextState => StatusCode::CONFLICT,
        PipelineError::RecordNotFound { .. }
        | PipelineError::NoSuchJob(_)
        | PipelineError::NotInStage { .. } => StatusCode::NOT_FOUND,
        PipelineError::InvalidFieldFormat(_) | PipelineError::InvalidIndex { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PipelineError::OperationNotAllowedInContext { .. } => StatusCode::FORBIDDEN,
    }
}

fn error_response(error: PipelineError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (status_for(&error), axum::Json(payload)).into_response()
}

fn outcome_response(status: StatusCode, result: Result<CommandOutcome, PipelineError>) -> Response {
    match result {
        Ok(outcome) => (status, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn parse_index(raw: usize) -> Result<Index, PipelineError> {
    Ok(Index::from_one_based(raw)?)
}

fn parse_job(raw: &str) -> Result<JobName, PipelineError> {
    Ok(JobName::parse(raw)?)
}

pub(crate) async fn list_persons(State(pipeline): State<SharedPipeline>) -> Response {
    let persons = lock(&pipeline).filtered_persons();
    (StatusCode::OK, axum::Json(persons)).into_response()
}

pub(crate) async fn add_person(
    State(pipeline): State<SharedPipeline>,
    axum::Json(person): axum::Json<Person>,
) -> Response {
    let result = lock(&pipeline).add_person(person);
    outcome_response(StatusCode::CREATED, result)
}

pub(crate) async fn edit_person(
    State(pipeline): State<SharedPipeline>,
    Path(index): Path<usize>,
    axum::Json(patch): axum::Json<PersonPatch>,
) -> Response {
    let result = parse_index(index).and_then(|index| lock(&pipeline).edit_person(index, patch));
    outcome_response(StatusCode::OK, result)
}

pub(crate) async fn delete_person(
    State(pipeline): State<SharedPipeline>,
    Path(index): Path<usize>,
) -> Response {
    let result = parse_index(index).and_then(|index| lock(&pipeline).delete_person(index));
    outcome_response(StatusCode::OK, result)
}

pub(crate) async fn list_jobs(State(pipeline): State<SharedPipeline>) -> Response {
    let jobs = lock(&pipeline).list_jobs();
    (StatusCode::OK, axum::Json(jobs)).into_response()
}

pub(crate) async fn get_job(
    State(pipeline): State<SharedPipeline>,
    Path(job): Path<String>,
) -> Response {
    match parse_job(&job).and_then(|job| lock(&pipeline).get_job(&job)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_person_to_job(
    State(pipeline): State<SharedPipeline>,
    Path(job): Path<String>,
    axum::Json(request): axum::Json<EnrolRequest>,
) -> Response {
    let result = parse_job(&job)
        .and_then(|job| lock(&pipeline).add_person_to_job(&job, &request.nric, request.stage));
    outcome_response(StatusCode::CREATED, result)
}

pub(crate) async fn move_persons(
    State(pipeline): State<SharedPipeline>,
    Path(job): Path<String>,
    axum::Json(body): axum::Json<MoveBody>,
) -> Response {
    let result = parse_job(&job).and_then(|job| {
        lock(&pipeline).move_persons(MoveRequest {
            job,
            from: body.from,
            to: body.to,
            to_job: body.to_job,
            indices: body.indices,
        })
    });
    outcome_response(StatusCode::OK, result)
}

pub(crate) async fn set_filter(
    State(pipeline): State<SharedPipeline>,
    axum::Json(filter): axum::Json<PersonFilter>,
) -> Response {
    let mut guard = lock(&pipeline);
    let outcome = guard.set_filter(filter);
    let persons = guard.filtered_persons();
    let payload = json!({
        "summary": outcome.summary,
        "persons": persons,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn clear_filter(State(pipeline): State<SharedPipeline>) -> Response {
    let outcome = lock(&pipeline).clear_filter();
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

pub(crate) async fn set_display(
    State(pipeline): State<SharedPipeline>,
    axum::Json(mode): axum::Json<DisplayMode>,
) -> Response {
    let mut guard = lock(&pipeline);
    let result = match mode {
        DisplayMode::AllJobs => Ok(guard.display_all_jobs()),
        DisplayMode::Job(job) => guard.display_job(&job),
    };
    outcome_response(StatusCode::OK, result)
}

pub(crate) async fn history(State(pipeline): State<SharedPipeline>) -> Response {
    let entries = lock(&pipeline).history();
    (StatusCode::OK, axum::Json(entries)).into_response()
}

pub(crate) async fn undo(State(pipeline): State<SharedPipeline>) -> Response {
    let result = lock(&pipeline).undo();
    outcome_response(StatusCode::OK, result)
}

pub(crate) async fn redo(State(pipeline): State<SharedPipeline>) -> Response {
    let result = lock(&pipeline).redo();
    outcome_response(StatusCode::OK, result)
}

pub(crate) async fn analytics(State(pipeline): State<SharedPipeline>) -> Response {
    let analytics = lock(&pipeline).analytics();
    (StatusCode::OK, axum::Json(analytics)).into_response()
}
