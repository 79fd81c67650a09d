//! Candidate hiring pipeline: an in-memory record store of persons and jobs with
//! staged pipelines, filtering, and linear undo/redo history.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
