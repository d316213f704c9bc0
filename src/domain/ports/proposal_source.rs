//! Proposal source port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Artifact, HistoryEntry, LogicalSpec};

/// Port trait for the stochastic proposal source.
///
/// Given the logical specification and an immutable snapshot of the
/// refinement history so far, produces a fresh candidate artifact. The
/// history slice is read-only by contract: the engine alone appends entries,
/// one per rejected iteration.
///
/// Implementations are expected to handle their own transport failures
/// (retry, simulation fallback) rather than surfacing them — an error
/// returned here is treated as fatal by the engine, not retried.
#[async_trait]
pub trait ProposalSource: Send + Sync {
    /// Sample a candidate artifact conditioned on the accumulated history.
    async fn propose(
        &self,
        spec: &LogicalSpec,
        history: &[HistoryEntry],
    ) -> DomainResult<Artifact>;
}
