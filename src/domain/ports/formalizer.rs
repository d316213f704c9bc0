//! Formalizer port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::TraceSpec;

/// Port trait for the natural-language-to-specification translator.
///
/// Turns an opaque intent string into a named set of behavioral predicates.
/// Called exactly once per solve; a failure is fatal to the call and is never
/// retried by the engine.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for use across tokio tasks.
#[async_trait]
pub trait Formalizer: Send + Sync {
    /// Extract a behavioral trace specification from a natural-language
    /// intent.
    async fn formalize(&self, intent: &str) -> DomainResult<TraceSpec>;
}
