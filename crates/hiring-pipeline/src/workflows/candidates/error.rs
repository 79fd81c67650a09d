use super::domain::{FieldError, Nric};
use super::job::{JobName, Stage};

/// Failure kinds reported by every pipeline operation. All are recoverable; a failed
/// operation leaves the registries as they were.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("a person matching {nric} already exists")]
    DuplicateRecord { nric: Nric },
    #[error("no person with NRIC {nric} exists")]
    RecordNotFound { nric: Nric },
    #[error("job {0} does not exist")]
    NoSuchJob(JobName),
    #[error("{nric} is not in the {stage} list of {job}")]
    NotInStage {
        nric: Nric,
        job: JobName,
        stage: Stage,
    },
    #[error("{nric} is already in the {stage} list of {job}")]
    DuplicateInStage {
        nric: Nric,
        job: JobName,
        stage: Stage,
    },
    #[error(transparent)]
    InvalidFieldFormat(#[from] FieldError),
    #[error("index {index} is out of range for a list of {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("no earlier state to undo to")]
    NoPriorState,
    #[error("no later state to redo to")]
    NoNextState,
    #[error("{operation} is only available while displaying all jobs")]
    OperationNotAllowedInContext { operation: &'static str },
}

impl PipelineError {
    /// Stable machine-readable name of the failure kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            PipelineError::DuplicateRecord { .. } => "duplicate_record",
            PipelineError::RecordNotFound { .. } => "record_not_found",
            PipelineError::NoSuchJob(_) => "no_such_job",
            PipelineError::NotInStage { .. } => "not_in_stage",
            PipelineError::DuplicateInStage { .. } => "duplicate_in_stage",
            PipelineError::InvalidFieldFormat(_) => "invalid_field_format",
            PipelineError::InvalidIndex { .. } => "invalid_index",
            PipelineError::NoPriorState => "no_prior_state",
            PipelineError::NoNextState => "no_next_state",
            PipelineError::OperationNotAllowedInContext { .. } => {
                "operation_not_allowed_in_context"
            }
        }
    }
}
