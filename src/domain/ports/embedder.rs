//! Logical embedder port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{LogicalSpec, TraceSpec};

/// Port trait for the specification-embedding step.
///
/// Lifts a behavioral [`TraceSpec`] into verifier-ready source text: a theorem
/// statement with an unresolved proof obligation plus its import list. Called
/// exactly once per solve; a failure is fatal to the call and is never retried
/// by the engine.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a trace specification into a formal theorem.
    async fn embed(&self, spec: &TraceSpec) -> DomainResult<LogicalSpec>;
}
