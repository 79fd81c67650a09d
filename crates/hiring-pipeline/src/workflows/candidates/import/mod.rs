mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::error::PipelineError;
use super::job::Stage;
use super::registry::{DuplicateRule, PipelineState};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { row: usize, source: PipelineError },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Row { row, source } => {
                write!(f, "roster row {} is invalid: {}", row, source)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Row { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Loads a candidate roster into an initial pipeline state.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        rule: DuplicateRule,
    ) -> Result<(PipelineState, ImportSummary), RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, rule)
    }

    /// Rows are validated in order; the first invalid row aborts the import. Rows
    /// describing an already imported person are skipped.
    pub fn from_reader<R: Read>(
        reader: R,
        rule: DuplicateRule,
    ) -> Result<(PipelineState, ImportSummary), RosterImportError> {
        let mut state = PipelineState::new(rule);
        let mut summary = ImportSummary::default();

        for (offset, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let row_number = offset + 1;
            let person = row.into_person().map_err(|err| RosterImportError::Row {
                row: row_number,
                source: err.into(),
            })?;

            if state.persons.has(&person) {
                debug!(row = row_number, nric = %person.nric, "skipped duplicate roster row");
                summary.skipped += 1;
                continue;
            }

            for job in &person.jobs_applied {
                if let Err(error) = state.jobs.add_to_stage(job, &person.nric, Stage::Applicant) {
                    debug!(row = row_number, %error, "skipped roster enrolment");
                }
            }
            state
                .persons
                .add(person)
                .map_err(|source| RosterImportError::Row {
                    row: row_number,
                    source,
                })?;
            summary.imported += 1;
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "roster imported"
        );
        Ok((state, summary))
    }
}
