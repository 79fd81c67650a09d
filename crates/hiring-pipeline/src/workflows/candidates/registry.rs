use serde::{Deserialize, Serialize};

use super::domain::{Nric, Person};
use super::error::PipelineError;
use super::job::{Job, JobName, JobView, Stage, StageLists};

/// Rule deciding when two person records describe the same candidate. A pipeline
/// applies one rule at every call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateRule {
    /// Same NRIC.
    #[default]
    Identity,
    /// Same NRIC, or same name with a matching phone number or e-mail address.
    IdentityOrContact,
}

impl DuplicateRule {
    pub fn from_config_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" | "nric" => Some(Self::Identity),
            "identity_or_contact" | "contact" => Some(Self::IdentityOrContact),
            _ => None,
        }
    }

    pub fn same_person(self, left: &Person, right: &Person) -> bool {
        if left.nric == right.nric {
            return true;
        }
        match self {
            DuplicateRule::Identity => false,
            DuplicateRule::IdentityOrContact => {
                left.name.as_str().to_lowercase() == right.name.as_str().to_lowercase()
                    && (left.phone == right.phone || left.email == right.email)
            }
        }
    }
}

/// Canonical candidate records in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRegistry {
    #[serde(default)]
    rule: DuplicateRule,
    persons: Vec<Person>,
}

impl PersonRegistry {
    pub fn new(rule: DuplicateRule) -> Self {
        Self {
            rule,
            persons: Vec::new(),
        }
    }

    pub fn rule(&self) -> DuplicateRule {
        self.rule
    }

    pub fn has(&self, person: &Person) -> bool {
        self.persons
            .iter()
            .any(|existing| self.rule.same_person(existing, person))
    }

    pub fn add(&mut self, person: Person) -> Result<(), PipelineError> {
        if self.has(&person) {
            return Err(PipelineError::DuplicateRecord { nric: person.nric });
        }
        self.persons.push(person);
        Ok(())
    }

    /// Swaps `old` for `new` in place, keeping its position. `new` is checked against
    /// every other record, so an edit can never take over another record's identity.
    pub fn replace(&mut self, old: &Person, new: Person) -> Result<(), PipelineError> {
        let position = self
            .position(&old.nric)
            .ok_or_else(|| PipelineError::RecordNotFound {
                nric: old.nric.clone(),
            })?;

        let collides = self
            .persons
            .iter()
            .enumerate()
            .any(|(idx, existing)| idx != position && self.rule.same_person(existing, &new));
        if collides {
            return Err(PipelineError::DuplicateRecord { nric: new.nric });
        }

        self.persons[position] = new;
        Ok(())
    }

    pub fn remove(&mut self, person: &Person) -> Result<Person, PipelineError> {
        let position = self
            .position(&person.nric)
            .ok_or_else(|| PipelineError::RecordNotFound {
                nric: person.nric.clone(),
            })?;
        Ok(self.persons.remove(position))
    }

    pub fn get(&self, nric: &Nric) -> Option<&Person> {
        self.persons.iter().find(|person| &person.nric == nric)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn as_slice(&self) -> &[Person] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    fn position(&self, nric: &Nric) -> Option<usize> {
        self.persons.iter().position(|person| &person.nric == nric)
    }
}

/// Named jobs in creation order. Jobs are created on first enrolment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRegistry {
    jobs: Vec<Job>,
}

impl JobRegistry {
    pub fn get(&self, name: &JobName) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name() == name)
    }

    pub fn contains(&self, name: &JobName) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn lists_of(&self, name: &JobName) -> Result<&StageLists, PipelineError> {
        self.get(name)
            .map(Job::stages)
            .ok_or_else(|| PipelineError::NoSuchJob(name.clone()))
    }

    /// Appends `nric` to `stage` of `name`, creating the job if needed. A candidate
    /// holds at most one stage per job, so any existing membership is a conflict.
    pub fn add_to_stage(
        &mut self,
        name: &JobName,
        nric: &Nric,
        stage: Stage,
    ) -> Result<(), PipelineError> {
        if let Some(existing) = self.get(name).and_then(|job| job.stage_of(nric)) {
            return Err(PipelineError::DuplicateInStage {
                nric: nric.clone(),
                job: name.clone(),
                stage: existing,
            });
        }
        self.get_or_create(name).push(stage, nric.clone());
        Ok(())
    }

    /// Moves one candidate between stage-lists. Either both the removal and the
    /// append happen or neither does.
    pub fn move_person(
        &mut self,
        nric: &Nric,
        from_job: &JobName,
        from_stage: Stage,
        to_job: &JobName,
        to_stage: Stage,
    ) -> Result<(), PipelineError> {
        let source_index = self
            .index_of(from_job)
            .ok_or_else(|| PipelineError::NoSuchJob(from_job.clone()))?;
        let position = self.jobs[source_index]
            .position(from_stage, nric)
            .ok_or_else(|| PipelineError::NotInStage {
                nric: nric.clone(),
                job: from_job.clone(),
                stage: from_stage,
            })?;

        if from_job == to_job && from_stage == to_stage {
            return Err(PipelineError::DuplicateInStage {
                nric: nric.clone(),
                job: to_job.clone(),
                stage: to_stage,
            });
        }

        let removed = self.jobs[source_index].remove_at(from_stage, position);

        if let Some(existing) = self.get(to_job).and_then(|job| job.stage_of(&removed)) {
            self.jobs[source_index].insert_at(from_stage, position, removed);
            return Err(PipelineError::DuplicateInStage {
                nric: nric.clone(),
                job: to_job.clone(),
                stage: existing,
            });
        }

        self.get_or_create(to_job).push(to_stage, removed);
        Ok(())
    }

    pub(crate) fn rekey(&mut self, old: &Nric, new: &Nric) {
        for job in &mut self.jobs {
            job.rekey(old, new);
        }
    }

    pub(crate) fn purge(&mut self, nric: &Nric) {
        for job in &mut self.jobs {
            job.purge(nric);
        }
    }

    fn index_of(&self, name: &JobName) -> Option<usize> {
        self.jobs.iter().position(|job| job.name() == name)
    }

    fn get_or_create(&mut self, name: &JobName) -> &mut Job {
        let index = match self.index_of(name) {
            Some(index) => index,
            None => {
                self.jobs.push(Job::new(name.clone()));
                self.jobs.len() - 1
            }
        };
        &mut self.jobs[index]
    }
}

/// Full record-store state. This is the unit the history snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub persons: PersonRegistry,
    pub jobs: JobRegistry,
}

impl PipelineState {
    pub fn new(rule: DuplicateRule) -> Self {
        Self {
            persons: PersonRegistry::new(rule),
            jobs: JobRegistry::default(),
        }
    }

    /// Resolves a job's stage-lists to person records.
    pub fn job_view(&self, name: &JobName) -> Result<JobView, PipelineError> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| PipelineError::NoSuchJob(name.clone()))?;
        let resolve = |stage: Stage| -> Vec<Person> {
            job.list(stage)
                .iter()
                .filter_map(|nric| self.persons.get(nric).cloned())
                .collect()
        };

        Ok(JobView {
            name: job.name().clone(),
            applicant: resolve(Stage::Applicant),
            kiv: resolve(Stage::Kiv),
            interview: resolve(Stage::Interview),
            shortlist: resolve(Stage::Shortlist),
        })
    }
}
