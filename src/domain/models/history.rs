//! Refinement history and metrics records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact::Artifact;

/// One record per refinement iteration.
///
/// The history sequence is append-only, owned exclusively by the refinement
/// engine for the lifetime of one solve call, and handed to the sampling
/// source as an immutable snapshot on each iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistoryEntry {
    /// Zero-based refinement step this entry was recorded at.
    pub step_index: u32,

    /// The rejected candidate. Absent for tool-failure iterations, where no
    /// judgment on the candidate itself was reached.
    pub artifact: Option<Artifact>,

    /// Bounded feedback text fed back to the sampling source.
    pub feedback: String,

    /// Raw error output retained for diagnostics.
    pub raw_error: String,

    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry for a logically rejected candidate.
    pub fn logical(
        step_index: u32,
        artifact: Artifact,
        feedback: impl Into<String>,
        raw_error: impl Into<String>,
    ) -> Self {
        Self {
            step_index,
            artifact: Some(artifact),
            feedback: feedback.into(),
            raw_error: raw_error.into(),
            recorded_at: Utc::now(),
        }
    }

    /// Entry for a toolchain failure; carries no artifact.
    pub fn tool_failure(
        step_index: u32,
        feedback: impl Into<String>,
        raw_error: impl Into<String>,
    ) -> Self {
        Self {
            step_index,
            artifact: None,
            feedback: feedback.into(),
            raw_error: raw_error.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Per-iteration observability log for convergence plotting.
///
/// Parallel sequences, one element per loop iteration. Write-only from the
/// engine's perspective; external reporting reads it after the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SynthesisLog {
    /// Iteration indices, in order.
    pub iterations: Vec<u32>,

    /// Unsolved goal count reported by the oracle at each iteration.
    pub unsolved_goals: Vec<u32>,

    /// Convergence potential Φ at each iteration.
    pub potential: Vec<f64>,

    /// Free-form phase/transition events for the run.
    pub events: Vec<String>,
}

impl SynthesisLog {
    /// Record one loop iteration.
    pub fn record_iteration(&mut self, iteration: u32, unsolved_goals: u32, potential: f64) {
        self.iterations.push(iteration);
        self.unsolved_goals.push(unsolved_goals);
        self.potential.push(potential);
    }

    /// Record a phase transition or notable event.
    pub fn record_event(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// Whether any iteration has been recorded.
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}
