//! Convergence potential Φ: scalar distance-to-correct metric.
//!
//! Combines a static count of admitted-proof markers in the candidate with
//! the verification outcome into a non-negative score. Recorded once per
//! iteration for convergence plotting; it does not gate the refinement loop.

use crate::domain::models::{Artifact, Status, VerificationResult, ADMITTED_MARKER};

/// Weights for the potential computation.
#[derive(Debug, Clone, Copy)]
pub struct PotentialWeights {
    /// Weight per unsolved goal reported by the oracle.
    pub goals: f64,
    /// Weight per admitted-proof marker in the candidate.
    pub admitted: f64,
    /// Flat penalty for tool failures and unparseable logical errors.
    pub error: f64,
}

impl Default for PotentialWeights {
    fn default() -> Self {
        Self {
            goals: 1.0,
            admitted: 2.0,
            error: 5.0,
        }
    }
}

/// Computes the scalar "distance from correct" of a synthesis state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotentialCalculator {
    weights: PotentialWeights,
}

impl PotentialCalculator {
    pub fn new(weights: PotentialWeights) -> Self {
        Self { weights }
    }

    /// Compute Φ for a candidate and, when available, its verification
    /// result.
    ///
    /// Zero exactly when the oracle accepted the candidate and its proof
    /// contains no admitted markers. A compiler-accepted proof that still
    /// admits goals keeps its non-zero base: accepted is not the same as
    /// complete.
    pub fn compute(&self, artifact: &Artifact, result: Option<&VerificationResult>) -> f64 {
        let admitted_count = count_admitted_markers(&artifact.proof_script);
        let mut potential = f64::from(admitted_count) * self.weights.admitted;

        let Some(result) = result else {
            return potential;
        };

        match result.status {
            Status::Ok => {
                if admitted_count == 0 {
                    return 0.0;
                }
            }
            Status::ErrLogical => {
                potential += f64::from(result.unsolved_goal_count) * self.weights.goals;
                // A logical error with no extractable goal count (e.g. a
                // syntax error that suppresses goal display) still gets a
                // generic penalty.
                if result.unsolved_goal_count == 0 {
                    potential += self.weights.error;
                }
            }
            Status::ErrTool => {
                potential += self.weights.error;
            }
        }

        potential
    }
}

/// Statically count admitted-proof markers in a proof script.
///
/// Matches the reserved token on word boundaries only, with `--` line
/// comments stripped first.
fn count_admitted_markers(proof_script: &str) -> u32 {
    let marker = ADMITTED_MARKER.as_bytes();
    let mut count: u32 = 0;

    for line in proof_script.lines() {
        let code = line.split("--").next().unwrap_or("");
        let bytes = code.as_bytes();
        if bytes.len() < marker.len() {
            continue;
        }

        for start in 0..=(bytes.len() - marker.len()) {
            if &bytes[start..start + marker.len()] != marker {
                continue;
            }
            let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
            let end = start + marker.len();
            let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
            if before_ok && after_ok {
                count += 1;
            }
        }
    }

    count
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
