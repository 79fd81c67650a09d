use hiring_pipeline::config::PipelineConfig;
use hiring_pipeline::error::AppError;
use hiring_pipeline::workflows::candidates::{CandidatePipeline, RosterImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the starting pipeline: the configured roster when one is set, otherwise an
/// empty record store. Either way the starting state is the first history entry.
pub(crate) fn load_pipeline(config: &PipelineConfig) -> Result<CandidatePipeline, AppError> {
    match &config.roster_csv {
        Some(path) => {
            let (state, summary) = RosterImporter::from_path(path, config.duplicate_rule)?;
            info!(
                path = %path.display(),
                imported = summary.imported,
                skipped = summary.skipped,
                "loaded roster"
            );
            Ok(CandidatePipeline::with_state(state))
        }
        None => Ok(CandidatePipeline::new(config.duplicate_rule)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiring_pipeline::workflows::candidates::DuplicateRule;
    use std::path::PathBuf;

    #[test]
    fn empty_store_without_roster() {
        let config = PipelineConfig {
            duplicate_rule: DuplicateRule::IdentityOrContact,
            roster_csv: None,
        };

        let pipeline = load_pipeline(&config).expect("empty pipeline");

        assert!(pipeline.state().persons.is_empty());
        assert_eq!(
            pipeline.state().persons.rule(),
            DuplicateRule::IdentityOrContact
        );
        assert_eq!(pipeline.history().len(), 1);
    }

    #[test]
    fn missing_roster_is_an_import_error() {
        let config = PipelineConfig {
            duplicate_rule: DuplicateRule::Identity,
            roster_csv: Some(PathBuf::from("./no-such-roster.csv")),
        };

        match load_pipeline(&config) {
            Err(AppError::Import(_)) => {}
            Err(other) => panic!("expected import error, got {other}"),
            Ok(_) => panic!("expected import error"),
        }
    }
}
