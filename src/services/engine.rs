//! Refinement engine: the bounded sample → verify → classify → re-prompt loop.
//!
//! Drives one synthesis run through its phases: formalize the intent, embed
//! the behavioral spec into a theorem, then iterate the refinement loop until
//! the oracle accepts a candidate or the step budget is exhausted.
//!
//! Failure semantics: formalizer and embedder failures are fatal to the solve
//! call and are never retried here. The oracle never fails — tool-level
//! problems arrive as `ErrTool` results and are absorbed by the backoff
//! branch. Tool-error iterations consume the same step budget as logical
//! ones; the budget bounds total wall time, not just sampling attempts.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Artifact, HistoryEntry, LogicalSpec, RefinementConfig, Status, SynthesisLog,
};
use crate::domain::ports::{Embedder, Formalizer, Oracle, ProposalSource};
use crate::services::potential::PotentialCalculator;

/// Feedback recorded for tool-failure iterations, where no judgment on the
/// candidate itself was reached.
const TOOL_FAILURE_FEEDBACK: &str =
    "Verifier tooling failed on the last attempt. Optimize the proof and retry.";

/// The synthesis state machine.
///
/// One engine instance drives one solve call at a time; history and metrics
/// are private to the instance and reset on every call.
pub struct RefinementEngine {
    config: RefinementConfig,
    formalizer: Arc<dyn Formalizer>,
    embedder: Arc<dyn Embedder>,
    proposals: Arc<dyn ProposalSource>,
    oracle: Arc<dyn Oracle>,
    potential: PotentialCalculator,
    metrics: SynthesisLog,
}

impl RefinementEngine {
    pub fn new(
        config: RefinementConfig,
        formalizer: Arc<dyn Formalizer>,
        embedder: Arc<dyn Embedder>,
        proposals: Arc<dyn ProposalSource>,
        oracle: Arc<dyn Oracle>,
    ) -> Self {
        Self {
            config,
            formalizer,
            embedder,
            proposals,
            oracle,
            potential: PotentialCalculator::default(),
            metrics: SynthesisLog::default(),
        }
    }

    /// Replace the default potential weights.
    pub fn with_potential(mut self, potential: PotentialCalculator) -> Self {
        self.potential = potential;
        self
    }

    /// Observability log of the most recent solve call.
    pub fn metrics(&self) -> &SynthesisLog {
        &self.metrics
    }

    /// Run one full synthesis: `Ok(Some(artifact))` on verified success,
    /// `Ok(None)` when the step budget is exhausted, `Err` on a fatal
    /// setup-phase failure.
    pub async fn solve(&mut self, intent: &str) -> DomainResult<Option<Artifact>> {
        let session = Uuid::new_v4();
        self.metrics = SynthesisLog::default();

        info!(
            session = %session,
            intent = %truncate_for_log(intent, 50),
            "Starting synthesis"
        );

        self.metrics.record_event("formalizing");
        let trace_spec = self.formalizer.formalize(intent).await?;
        info!(session = %session, spec = %trace_spec.name, "Generated trace specification");

        self.metrics.record_event("embedding");
        let logical_spec = self.embedder.embed(&trace_spec).await?;
        info!(session = %session, theorem = %logical_spec.theorem_name, "Embedded logical specification");

        let outcome = self.refinement_loop(session, &logical_spec).await?;

        if outcome.is_some() {
            self.metrics.record_event("success");
            info!(session = %session, "Synthesis successful");
        } else {
            self.metrics.record_event("failure");
            error!(
                session = %session,
                max_steps = self.config.max_refinement_steps,
                "Synthesis failed: step budget exhausted"
            );
        }

        Ok(outcome)
    }

    async fn refinement_loop(
        &mut self,
        session: Uuid,
        spec: &LogicalSpec,
    ) -> DomainResult<Option<Artifact>> {
        let timeout = Duration::from_secs(self.config.timeout_per_verification_secs);
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut step: u32 = 0;

        while step < self.config.max_refinement_steps {
            debug!(session = %session, step, "Refinement step");
            self.metrics.record_event(format!("refining step {step}"));

            // 1. Sample a candidate conditioned on the history snapshot.
            let candidate = self.proposals.propose(spec, &history).await?;

            // 2. Query the oracle.
            let result = self.oracle.verify(spec, &candidate, timeout).await;

            // 3. Record convergence metrics unconditionally.
            let phi = self.potential.compute(&candidate, Some(&result));
            self.metrics
                .record_iteration(step, result.unsolved_goal_count, phi);
            debug!(session = %session, step, potential = phi, "Recorded potential");

            // 4. Transition on the outcome.
            match result.status {
                Status::Ok => {
                    // The oracle's verdict is authoritative. A candidate it
                    // accepted can still carry admitted markers; flag the
                    // divergence for review instead of rejecting it.
                    if phi > 0.0 {
                        warn!(
                            session = %session,
                            step,
                            potential = phi,
                            "Accepted candidate still contains admitted proof markers"
                        );
                    }
                    return Ok(Some(candidate));
                }
                Status::ErrLogical => {
                    warn!(session = %session, step, summary = %result.summary, "Logical error");
                    history.push(HistoryEntry::logical(
                        step,
                        candidate,
                        result.feedback,
                        result.raw_stderr,
                    ));
                }
                Status::ErrTool => {
                    let delay = backoff_delay(self.config.backoff_factor, step);
                    warn!(
                        session = %session,
                        step,
                        summary = %result.summary,
                        delay_secs = delay.as_secs_f64(),
                        "Tool error, backing off"
                    );
                    history.push(HistoryEntry::tool_failure(
                        step,
                        TOOL_FAILURE_FEEDBACK,
                        result.raw_stderr,
                    ));
                    sleep(delay).await;
                }
            }

            step += 1;
        }

        Ok(None)
    }
}

/// Exponential backoff keyed to the step index: `backoff_factor^(step+1)`
/// seconds. Every outcome advances the step, so consecutive tool errors get
/// strictly growing delays.
fn backoff_delay(backoff_factor: f64, step: u32) -> Duration {
    let exponent = i32::try_from(step.saturating_add(1)).unwrap_or(i32::MAX);
    Duration::from_secs_f64(backoff_factor.powi(exponent))
}

fn truncate_for_log(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
