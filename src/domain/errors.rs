//! Domain errors for the synthesis engine.
//!
//! Only setup-phase failures are fatal: a formalizer or embedder failure
//! aborts the whole solve call, as does a proposal source that surfaces an
//! error instead of handling its own fallback. Verification failures are
//! never represented here — the oracle converts every failure mode into an
//! `ErrTool` verification result and the loop handles it.

use thiserror::Error;

/// Fatal errors that abort a solve call.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Formalization failed: {0}")]
    Formalization(String),

    #[error("Logical embedding failed: {0}")]
    Embedding(String),

    #[error("Proposal source failed: {0}")]
    Proposal(String),
}

pub type DomainResult<T> = Result<T, SynthesisError>;
