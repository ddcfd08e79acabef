//! Completion tracking for challenges.
//!
//! Completion is recorded in a persisted set keyed by challenge id, not
//! re-derived from the circuit: once a challenge passes verification it
//! stays completed even if the user later breaks the wiring. The set only
//! ever grows (insert and union; no removal). The JSON form is a plain
//! array of ids, the same shape the original web app kept in localStorage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a challenge stands for the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    /// No wires yet and never completed.
    NotStarted,
    /// Wires exist but verification has not passed.
    InProgress,
    /// Terminal and sticky.
    Completed,
}

/// The persisted set of completed challenge ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet {
    completed: BTreeSet<String>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion. Returns `true` if it was newly recorded.
    pub fn mark_complete(&mut self, id: &str) -> bool {
        self.completed.insert(id.to_owned())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    /// Set union with another completion set (e.g. one loaded from disk).
    pub fn merge(&mut self, other: &CompletionSet) {
        self.completed
            .extend(other.completed.iter().cloned());
    }

    /// Fraction of `ids` that are completed, for progress meters.
    /// An empty curriculum reports zero.
    pub fn fraction_of(&self, ids: &[&str]) -> f64 {
        if ids.is_empty() {
            return 0.0;
        }
        let done = ids.iter().filter(|id| self.contains(id)).count();
        done as f64 / ids.len() as f64
    }

    /// Serialize to the persisted JSON array form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Parse the persisted JSON array form. Unreadable input yields an
    /// empty set rather than an error, so a corrupt save never blocks the
    /// app from starting.
    pub fn from_json(data: &str) -> Self {
        serde_json::from_str(data).unwrap_or_default()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
