//! Verification oracle port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::models::{Artifact, LogicalSpec, VerificationResult};

/// Port trait for the verification oracle.
///
/// `verify` is total: every failure mode of the underlying checker — I/O
/// errors while materializing the source unit, spawn failures, timeout
/// expiry — is converted into an `ErrTool` [`VerificationResult`]. No error
/// ever propagates to the refinement loop.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Check a candidate artifact against the logical specification, bounded
    /// by `timeout`.
    async fn verify(
        &self,
        spec: &LogicalSpec,
        candidate: &Artifact,
        timeout: Duration,
    ) -> VerificationResult;
}
