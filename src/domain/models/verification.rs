//! Verification outcome models.
//!
//! A verification attempt ends in exactly one of three mutually exclusive
//! [`Status`] kinds. [`VerificationResult`] wraps the status with a short
//! summary, a bounded feedback string suitable for re-prompting the sampling
//! source, and the raw checker output for diagnostics.

use serde::{Deserialize, Serialize};

/// Three-way outcome of a verification attempt.
///
/// The kinds are mutually exclusive and carry no ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The checker accepted the candidate.
    Ok,

    /// The toolchain functioned but the candidate is semantically wrong.
    /// Recoverable by re-prompting with feedback.
    ErrLogical,

    /// The toolchain itself failed or stalled (timeout, crash, environment).
    /// Recoverable by backoff and retry.
    ErrTool,
}

/// Structured result of one verification attempt.
///
/// `status == Ok ⟺ unsolved_goal_count == 0` is the intended invariant. It
/// holds for every result the classifier itself produces, but is not enforced
/// by construction; callers constructing results by hand are trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerificationResult {
    /// Outcome kind.
    pub status: Status,

    /// One-line classification label, e.g. `"Timeout"` or
    /// `"Type Mismatch (2 goals left)"`.
    pub summary: String,

    /// Bounded natural-language explanation for the sampling source.
    pub feedback: String,

    /// Raw standard output of the checker process.
    pub raw_stdout: String,

    /// Raw standard error of the checker process.
    pub raw_stderr: String,

    /// Estimated number of remaining proof obligations. Zero on success.
    pub unsolved_goal_count: u32,
}

impl VerificationResult {
    /// Successful verification.
    pub fn success(raw_stdout: impl Into<String>, raw_stderr: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            summary: "Verification Successful".to_string(),
            feedback: "The proof is correct. No errors found.".to_string(),
            raw_stdout: raw_stdout.into(),
            raw_stderr: raw_stderr.into(),
            unsolved_goal_count: 0,
        }
    }

    /// Toolchain failure. Used both by the classifier's indicator rules and by
    /// the oracle for failures that never reach the classifier (I/O errors,
    /// spawn failures, timeout expiry).
    pub fn tool_failure(
        summary: impl Into<String>,
        feedback: impl Into<String>,
        raw_stderr: impl Into<String>,
    ) -> Self {
        Self {
            status: Status::ErrTool,
            summary: summary.into(),
            feedback: feedback.into(),
            raw_stdout: String::new(),
            raw_stderr: raw_stderr.into(),
            unsolved_goal_count: 0,
        }
    }
}
