use std::collections::BTreeMap;

use serde::Serialize;

use super::job::Stage;
use super::registry::PipelineState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTotalEntry {
    pub stage: Stage,
    pub stage_label: &'static str,
    pub total: usize,
}

/// Aggregate view of the current registries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineAnalytics {
    pub persons: usize,
    pub jobs: usize,
    pub stage_totals: Vec<StageTotalEntry>,
    pub mean_grade: Option<f64>,
    pub mean_interview_score: Option<f64>,
    pub languages: BTreeMap<String, usize>,
}

impl PipelineAnalytics {
    pub fn from_state(state: &PipelineState) -> Self {
        let stage_totals = Stage::ordered()
            .into_iter()
            .map(|stage| StageTotalEntry {
                stage,
                stage_label: stage.label(),
                total: state.jobs.iter().map(|job| job.list(stage).len()).sum(),
            })
            .collect();

        let persons = state.persons.len();
        let mean = |total: f64| (persons > 0).then(|| round_2dp(total / persons as f64));
        let mean_grade = mean(state.persons.iter().map(|p| p.grade.value()).sum());
        let mean_interview_score =
            mean(state.persons.iter().map(|p| p.interview_scores.mean()).sum());

        let mut languages = BTreeMap::new();
        for lang in state.persons.iter().flat_map(|p| p.known_prog_langs.iter()) {
            *languages.entry(lang.to_string()).or_insert(0) += 1;
        }

        Self {
            persons,
            jobs: state.jobs.len(),
            stage_totals,
            mean_grade,
            mean_interview_score,
            languages,
        }
    }

    pub fn stage_total(&self, stage: Stage) -> usize {
        self.stage_totals
            .iter()
            .find(|entry| entry.stage == stage)
            .map_or(0, |entry| entry.total)
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
