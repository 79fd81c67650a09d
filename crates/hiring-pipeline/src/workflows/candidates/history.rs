use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::PipelineError;

#[derive(Debug, Clone)]
pub struct HistoryEntry<T> {
    pub label: String,
    pub committed_at: DateTime<Utc>,
    pub state: T,
}

/// Listing row for a committed snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntryView {
    pub position: usize,
    pub label: String,
    pub committed_at: DateTime<Utc>,
    pub current: bool,
}

/// Linear undo/redo over owned snapshots.
///
/// Position 0 always holds the initial state and the pointer always addresses a
/// stored entry. Committing after an undo drops every entry past the pointer.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<HistoryEntry<T>>,
    pointer: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "initial".to_string(),
                committed_at: Utc::now(),
                state: initial,
            }],
            pointer: 0,
        }
    }

    pub fn commit(&mut self, label: impl Into<String>, state: T) {
        self.entries.truncate(self.pointer + 1);
        self.entries.push(HistoryEntry {
            label: label.into(),
            committed_at: Utc::now(),
            state,
        });
        self.pointer = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Result<&T, PipelineError> {
        if !self.can_undo() {
            return Err(PipelineError::NoPriorState);
        }
        self.pointer -= 1;
        Ok(&self.entries[self.pointer].state)
    }

    pub fn redo(&mut self) -> Result<&T, PipelineError> {
        if !self.can_redo() {
            return Err(PipelineError::NoNextState);
        }
        self.pointer += 1;
        Ok(&self.entries[self.pointer].state)
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    pub fn current(&self) -> &HistoryEntry<T> {
        &self.entries[self.pointer]
    }

    pub fn position(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn views(&self) -> Vec<HistoryEntryView> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, entry)| HistoryEntryView {
                position,
                label: entry.label.clone(),
                committed_at: entry.committed_at,
                current: position == self.pointer,
            })
            .collect()
    }
}
