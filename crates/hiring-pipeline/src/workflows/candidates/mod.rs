//! Candidate hiring pipeline: person and job registries, stage moves, snapshot
//! history, filtering, and the JSON surface over them.

pub mod analytics;
pub mod domain;
pub mod error;
pub mod filter;
pub mod history;
pub mod import;
pub mod job;
pub mod registry;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analytics::{PipelineAnalytics, StageTotalEntry};
pub use domain::{
    Address, DisplayText, Email, FieldError, Gender, Grade, Index, InterviewScores,
    KnownProgLang, Major, Name, Nric, PastJob, Person, PersonPatch, Phone, Race, School, Tag,
};
pub use error::PipelineError;
pub use filter::{Keyword, NumericField, PersonFilter, PersonPredicate, RangeList, TextField};
pub use history::{History, HistoryEntryView};
pub use import::{ImportSummary, RosterImportError, RosterImporter};
pub use job::{Job, JobName, JobSummary, JobView, Stage, StageLists};
pub use registry::{DuplicateRule, JobRegistry, PersonRegistry, PipelineState};
pub use router::{pipeline_router, SharedPipeline};
pub use service::{
    CandidatePipeline, CommandOutcome, DisplayMode, MoveFailure, MoveOutcome, MoveRequest,
    OutcomePayload,
};
