//! LLM-backed formalizer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::client::ChatBackend;
use super::prompts::{build_formalizer_prompt, parse_predicate_lines, spec_name_from_intent,
    FORMALIZER_SYSTEM_PROMPT};
use crate::domain::errors::{DomainResult, SynthesisError};
use crate::domain::models::TraceSpec;
use crate::domain::ports::Formalizer;

/// Formalizer that prompts a chat backend and parses predicate lines out of
/// the response. Any backend failure is fatal to the solve call; there is no
/// retry at this layer.
pub struct LlmFormalizer {
    backend: Arc<dyn ChatBackend>,
}

impl LlmFormalizer {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Formalizer for LlmFormalizer {
    async fn formalize(&self, intent: &str) -> DomainResult<TraceSpec> {
        let prompt = build_formalizer_prompt(intent);
        let response = self
            .backend
            .complete(FORMALIZER_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| SynthesisError::Formalization(e.to_string()))?;

        let predicates = parse_predicate_lines(&response);
        if predicates.is_empty() {
            return Err(SynthesisError::Formalization(
                "no behavioral predicates could be parsed from the backend response".to_string(),
            ));
        }

        let spec = TraceSpec::new(spec_name_from_intent(intent), predicates);
        info!(
            spec = %spec.name,
            predicates = spec.predicates.len(),
            "Formalized intent"
        );
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::simulated::SimulatedBackend;

    #[tokio::test]
    async fn formalizes_canned_response() {
        let formalizer = LlmFormalizer::new(Arc::new(SimulatedBackend::new()));
        let spec = formalizer
            .formalize("a speculative stream processor")
            .await
            .unwrap();
        assert_eq!(spec.name, "ASpeculativeStreamProcessor");
        assert_eq!(spec.predicates.len(), 3);
        assert!(spec.predicates[0].starts_with("Mono:"));
    }

    #[tokio::test]
    async fn response_without_predicates_is_fatal() {
        let backend = SimulatedBackend::with_scripted_responses(vec![
            "I could not identify any properties.".to_string(),
        ]);
        let formalizer = LlmFormalizer::new(Arc::new(backend));
        let err = formalizer.formalize("whatever").await.unwrap_err();
        assert!(matches!(err, SynthesisError::Formalization(_)));
    }
}
