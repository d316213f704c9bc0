//! Candidate artifact model.
//!
//! An [`Artifact`] is one full candidate solution proposed by the sampling
//! source: an implementation, a proof script discharging the specification's
//! proof obligation, and a language tag. It is a value type — two artifacts
//! with the same content are interchangeable. Ownership transfers to the
//! caller of the refinement engine only on overall success.

use serde::{Deserialize, Serialize};

/// Source language of a candidate implementation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// The implementation is expressed directly in the checker's language.
    Lean,
    /// The implementation is a Python model; the proof covers its checker-side
    /// translation.
    Python,
}

/// A candidate implementation plus proof, proposed by the sampling source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Artifact {
    /// Supporting program definitions for the proof.
    pub program_code: String,

    /// Tactic script discharging the specification's proof obligation.
    pub proof_script: String,

    /// Language of `program_code`.
    pub language: Language,
}

impl Artifact {
    /// Create a new candidate artifact.
    pub fn new(
        program_code: impl Into<String>,
        proof_script: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            program_code: program_code.into(),
            proof_script: proof_script.into(),
            language,
        }
    }
}
