use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::domain::{FieldError, Nric, Person};

/// Job title. Equality, ordering and hashing ignore case so `Engineer` and
/// `engineer` name the same job; the original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobName(String);

impl JobName {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|ch| ch.is_alphanumeric() || ch == ' ' || ch == '-');
        if !valid {
            return Err(FieldError::new(
                "job name",
                raw,
                "may only contain letters, digits, spaces and hyphens",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for JobName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for JobName {}

impl PartialOrd for JobName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JobName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for JobName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl TryFrom<String> for JobName {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JobName> for String {
    fn from(value: JobName) -> Self {
        value.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline position of a candidate within a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Applicant,
    Kiv,
    Interview,
    Shortlist,
}

impl Stage {
    pub const fn ordered() -> [Self; 4] {
        [Self::Applicant, Self::Kiv, Self::Interview, Self::Shortlist]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::Kiv => "KIV",
            Self::Interview => "Interview",
            Self::Shortlist => "Shortlist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four ordered stage-lists of a job, holding candidate identity keys in
/// arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLists {
    pub applicant: Vec<Nric>,
    pub kiv: Vec<Nric>,
    pub interview: Vec<Nric>,
    pub shortlist: Vec<Nric>,
}

impl StageLists {
    pub fn get(&self, stage: Stage) -> &[Nric] {
        match stage {
            Stage::Applicant => &self.applicant,
            Stage::Kiv => &self.kiv,
            Stage::Interview => &self.interview,
            Stage::Shortlist => &self.shortlist,
        }
    }

    fn get_mut(&mut self, stage: Stage) -> &mut Vec<Nric> {
        match stage {
            Stage::Applicant => &mut self.applicant,
            Stage::Kiv => &mut self.kiv,
            Stage::Interview => &mut self.interview,
            Stage::Shortlist => &mut self.shortlist,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    name: JobName,
    stages: StageLists,
}

impl Job {
    pub fn new(name: JobName) -> Self {
        Self {
            name,
            stages: StageLists::default(),
        }
    }

    pub fn name(&self) -> &JobName {
        &self.name
    }

    pub fn stages(&self) -> &StageLists {
        &self.stages
    }

    pub fn list(&self, stage: Stage) -> &[Nric] {
        self.stages.get(stage)
    }

    /// Stage currently holding `nric`, if any.
    pub fn stage_of(&self, nric: &Nric) -> Option<Stage> {
        Stage::ordered()
            .into_iter()
            .find(|stage| self.stages.get(*stage).contains(nric))
    }

    pub(crate) fn position(&self, stage: Stage, nric: &Nric) -> Option<usize> {
        self.stages.get(stage).iter().position(|member| member == nric)
    }

    pub(crate) fn push(&mut self, stage: Stage, nric: Nric) {
        self.stages.get_mut(stage).push(nric);
    }

    pub(crate) fn remove_at(&mut self, stage: Stage, position: usize) -> Nric {
        self.stages.get_mut(stage).remove(position)
    }

    pub(crate) fn insert_at(&mut self, stage: Stage, position: usize, nric: Nric) {
        self.stages.get_mut(stage).insert(position, nric);
    }

    pub(crate) fn rekey(&mut self, old: &Nric, new: &Nric) {
        for stage in Stage::ordered() {
            for member in self.stages.get_mut(stage).iter_mut() {
                if member == old {
                    *member = new.clone();
                }
            }
        }
    }

    pub(crate) fn purge(&mut self, nric: &Nric) {
        for stage in Stage::ordered() {
            self.stages.get_mut(stage).retain(|member| member != nric);
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            name: self.name.clone(),
            applicants: self.stages.applicant.len(),
            kiv: self.stages.kiv.len(),
            interview: self.stages.interview.len(),
            shortlist: self.stages.shortlist.len(),
        }
    }
}

/// Per-stage head counts for job listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub name: JobName,
    pub applicants: usize,
    pub kiv: usize,
    pub interview: usize,
    pub shortlist: usize,
}

/// A job with its stage-lists resolved to full person records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    pub name: JobName,
    pub applicant: Vec<Person>,
    pub kiv: Vec<Person>,
    pub interview: Vec<Person>,
    pub shortlist: Vec<Person>,
}

impl JobView {
    pub fn list(&self, stage: Stage) -> &[Person] {
        match stage {
            Stage::Applicant => &self.applicant,
            Stage::Kiv => &self.kiv,
            Stage::Interview => &self.interview,
            Stage::Shortlist => &self.shortlist,
        }
    }
}
