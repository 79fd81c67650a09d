use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::analytics::PipelineAnalytics;
use super::domain::{FieldError, Index, Nric, Person, PersonPatch};
use super::error::PipelineError;
use super::filter::PersonFilter;
use super::history::{History, HistoryEntryView};
use super::job::{JobName, JobSummary, JobView, Stage};
use super::registry::{DuplicateRule, PipelineState};

/// What the job board currently shows. Adding and editing persons is only
/// permitted on the all-jobs board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "job", rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    AllJobs,
    Job(JobName),
}

/// Typed result attached to a [`CommandOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OutcomePayload {
    Person(Person),
    Job(JobView),
    Jobs(Vec<JobSummary>),
    Moves(MoveOutcome),
    Analytics(PipelineAnalytics),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<OutcomePayload>,
}

impl CommandOutcome {
    fn message(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            payload: None,
        }
    }

    fn with_payload(summary: impl Into<String>, payload: OutcomePayload) -> Self {
        Self {
            summary: summary.into(),
            payload: Some(payload),
        }
    }
}

/// Batch move of the candidates at `indices` of one stage-list. Indices are one-based
/// positions in the source list as it was before the batch started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub job: JobName,
    pub from: Stage,
    pub to: Stage,
    /// Destination job; defaults to `job`.
    #[serde(default)]
    pub to_job: Option<JobName>,
    pub indices: Vec<Index>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveFailure {
    pub index: Index,
    pub nric: Option<Nric>,
    pub kind: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub moved: Vec<Nric>,
    pub failures: Vec<MoveFailure>,
}

/// Single command-execution path over the person and job registries.
///
/// Each mutating call works on a copy of the live state and installs it only on
/// success, followed by exactly one history commit. A failed call leaves the
/// registries and history untouched.
#[derive(Debug, Clone)]
pub struct CandidatePipeline {
    state: PipelineState,
    history: History<PipelineState>,
    filter: PersonFilter,
    display: DisplayMode,
}

impl Default for CandidatePipeline {
    fn default() -> Self {
        Self::new(DuplicateRule::default())
    }
}

impl CandidatePipeline {
    pub fn new(rule: DuplicateRule) -> Self {
        Self::with_state(PipelineState::new(rule))
    }

    /// Starts from a loaded state, which becomes history position 0.
    pub fn with_state(state: PipelineState) -> Self {
        Self {
            history: History::new(state.clone()),
            state,
            filter: PersonFilter::default(),
            display: DisplayMode::AllJobs,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn display(&self) -> &DisplayMode {
        &self.display
    }

    pub fn filter(&self) -> &PersonFilter {
        &self.filter
    }

    pub fn add_person(&mut self, person: Person) -> Result<CommandOutcome, PipelineError> {
        self.require_all_jobs("add person")?;

        let mut next = self.state.clone();
        next.persons.add(person.clone())?;
        for job in &person.jobs_applied {
            if let Err(error) = next.jobs.add_to_stage(job, &person.nric, Stage::Applicant) {
                debug!(job = %job, %error, "skipped applicant enrolment");
            }
        }

        self.commit("add person", next);
        Ok(CommandOutcome::with_payload(
            format!("New person added: {}", person.name),
            OutcomePayload::Person(person),
        ))
    }

    pub fn edit_person(
        &mut self,
        index: Index,
        patch: PersonPatch,
    ) -> Result<CommandOutcome, PipelineError> {
        self.require_all_jobs("edit person")?;
        if patch.is_empty() {
            return Err(FieldError::new(
                "edit",
                "",
                "at least one field to edit must be provided",
            )
            .into());
        }

        let target = self.person_at(index)?;
        let edited = patch.apply(&target);

        let mut next = self.state.clone();
        next.persons.replace(&target, edited.clone())?;
        if edited.nric != target.nric {
            next.jobs.rekey(&target.nric, &edited.nric);
        }

        self.commit("edit person", next);
        Ok(CommandOutcome::with_payload(
            format!("Edited person: {}", edited.name),
            OutcomePayload::Person(edited),
        ))
    }

    pub fn delete_person(&mut self, index: Index) -> Result<CommandOutcome, PipelineError> {
        let target = self.person_at(index)?;

        let mut next = self.state.clone();
        let removed = next.persons.remove(&target)?;
        next.jobs.purge(&removed.nric);

        self.commit("delete person", next);
        Ok(CommandOutcome::with_payload(
            format!("Deleted person: {}", removed.name),
            OutcomePayload::Person(removed),
        ))
    }

    pub fn add_person_to_job(
        &mut self,
        job: &JobName,
        nric: &Nric,
        stage: Stage,
    ) -> Result<CommandOutcome, PipelineError> {
        let person = self
            .state
            .persons
            .get(nric)
            .cloned()
            .ok_or_else(|| PipelineError::RecordNotFound { nric: nric.clone() })?;

        let mut next = self.state.clone();
        next.jobs.add_to_stage(job, nric, stage)?;
        let view = next.job_view(job)?;

        self.commit("add person to job", next);
        Ok(CommandOutcome::with_payload(
            format!("Added {} to {} of {}", person.name, stage, job),
            OutcomePayload::Job(view),
        ))
    }

    pub fn move_person(
        &mut self,
        nric: &Nric,
        from_job: &JobName,
        from_stage: Stage,
        to_job: &JobName,
        to_stage: Stage,
    ) -> Result<CommandOutcome, PipelineError> {
        let mut next = self.state.clone();
        next.jobs
            .move_person(nric, from_job, from_stage, to_job, to_stage)?;
        let view = next.job_view(to_job)?;

        self.commit("move person", next);
        Ok(CommandOutcome::with_payload(
            format!("Moved {nric} from {from_stage} of {from_job} to {to_stage} of {to_job}"),
            OutcomePayload::Job(view),
        ))
    }

    /// Best-effort batch move. Each candidate moves atomically on its own; failures are
    /// collected and the successful moves are committed together.
    pub fn move_persons(&mut self, request: MoveRequest) -> Result<CommandOutcome, PipelineError> {
        let MoveRequest {
            job,
            from,
            to,
            to_job,
            indices,
        } = request;
        let to_job = to_job.unwrap_or_else(|| job.clone());
        let source = self.state.jobs.lists_of(&job)?.get(from).to_vec();

        let mut next = self.state.clone();
        let mut outcome = MoveOutcome::default();
        for index in indices {
            let Some(nric) = source.get(index.zero_based()) else {
                let error = PipelineError::InvalidIndex {
                    index: index.one_based(),
                    len: source.len(),
                };
                outcome.failures.push(MoveFailure {
                    index,
                    nric: None,
                    kind: error.kind(),
                    reason: error.to_string(),
                });
                continue;
            };

            match next.jobs.move_person(nric, &job, from, &to_job, to) {
                Ok(()) => outcome.moved.push(nric.clone()),
                Err(error) => outcome.failures.push(MoveFailure {
                    index,
                    nric: Some(nric.clone()),
                    kind: error.kind(),
                    reason: error.to_string(),
                }),
            }
        }

        if !outcome.failures.is_empty() {
            warn!(failed = outcome.failures.len(), job = %job, "batch move skipped candidates");
        }
        if !outcome.moved.is_empty() {
            self.commit("move persons", next);
        }

        let summary = format!(
            "Moved {} of {} candidates from {from} of {job} to {to} of {to_job}",
            outcome.moved.len(),
            outcome.moved.len() + outcome.failures.len(),
        );
        Ok(CommandOutcome::with_payload(summary, OutcomePayload::Moves(outcome)))
    }

    pub fn undo(&mut self) -> Result<CommandOutcome, PipelineError> {
        self.state = self.history.undo()?.clone();
        self.reconcile_display();
        info!(position = self.history.position(), "undo restored snapshot");
        Ok(CommandOutcome::message("Undo success!"))
    }

    pub fn redo(&mut self) -> Result<CommandOutcome, PipelineError> {
        self.state = self.history.redo()?.clone();
        self.reconcile_display();
        info!(position = self.history.position(), "redo restored snapshot");
        Ok(CommandOutcome::message("Redo success!"))
    }

    pub fn set_filter(&mut self, filter: PersonFilter) -> CommandOutcome {
        self.filter = filter;
        let listed = self.filtered_persons().len();
        CommandOutcome::message(format!("{listed} persons listed!"))
    }

    pub fn clear_filter(&mut self) -> CommandOutcome {
        self.set_filter(PersonFilter::default())
    }

    /// Persons in registry order that satisfy the active filter.
    pub fn filtered_persons(&self) -> Vec<Person> {
        self.filter.apply(self.state.persons.iter())
    }

    pub fn get_job(&self, name: &JobName) -> Result<JobView, PipelineError> {
        self.state.job_view(name)
    }

    pub fn list_jobs(&self) -> Vec<JobSummary> {
        self.state.jobs.iter().map(|job| job.summary()).collect()
    }

    pub fn display_job(&mut self, name: &JobName) -> Result<CommandOutcome, PipelineError> {
        let view = self.state.job_view(name)?;
        self.display = DisplayMode::Job(view.name.clone());
        Ok(CommandOutcome::with_payload(
            format!("Displaying job {}", view.name),
            OutcomePayload::Job(view),
        ))
    }

    pub fn display_all_jobs(&mut self) -> CommandOutcome {
        self.display = DisplayMode::AllJobs;
        CommandOutcome::with_payload("Displaying all jobs", OutcomePayload::Jobs(self.list_jobs()))
    }

    pub fn analytics(&self) -> PipelineAnalytics {
        PipelineAnalytics::from_state(&self.state)
    }

    pub fn history(&self) -> Vec<HistoryEntryView> {
        self.history.views()
    }

    fn require_all_jobs(&self, operation: &'static str) -> Result<(), PipelineError> {
        match self.display {
            DisplayMode::AllJobs => Ok(()),
            DisplayMode::Job(_) => Err(PipelineError::OperationNotAllowedInContext { operation }),
        }
    }

    fn person_at(&self, index: Index) -> Result<Person, PipelineError> {
        let mut visible = self.filtered_persons();
        let len = visible.len();
        if index.zero_based() >= len {
            return Err(PipelineError::InvalidIndex {
                index: index.one_based(),
                len,
            });
        }
        Ok(visible.swap_remove(index.zero_based()))
    }

    fn reconcile_display(&mut self) {
        if let DisplayMode::Job(name) = &self.display {
            if !self.state.jobs.contains(name) {
                debug!(job = %name, "displayed job no longer exists");
                self.display = DisplayMode::AllJobs;
            }
        }
    }

    fn commit(&mut self, label: &'static str, next: PipelineState) {
        self.state = next;
        self.history.commit(label, self.state.clone());
        debug!(label, depth = self.history.len(), "committed pipeline snapshot");
    }
}
