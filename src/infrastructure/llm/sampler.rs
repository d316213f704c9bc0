//! LLM-backed proposal source.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::client::ChatBackend;
use super::prompts::{build_refinement_prompt, extract_fenced_block, SYNTHESIZER_SYSTEM_PROMPT};
use super::simulated::SimulatedBackend;
use crate::domain::errors::{DomainResult, SynthesisError};
use crate::domain::models::{Artifact, HistoryEntry, Language, LogicalSpec};
use crate::domain::ports::ProposalSource;

/// Proposal source that prompts a chat backend with the specification plus
/// the history snapshot and parses the fenced code blocks out of the
/// response.
///
/// A live-backend failure falls back to the simulated response instead of
/// surfacing, so the refinement loop never sees a propose error from this
/// implementation.
pub struct LlmProposalSource {
    backend: Arc<dyn ChatBackend>,
    fallback: SimulatedBackend,
}

impl LlmProposalSource {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            fallback: SimulatedBackend::new(),
        }
    }
}

/// Parse a backend response into a candidate artifact.
///
/// The tactic proof is the first ```lean block, or the whole response when no
/// fence is found. Supporting definitions come from a ```python block when
/// present.
fn parse_artifact(response: &str) -> Artifact {
    let proof_script = extract_fenced_block(response, "lean")
        .unwrap_or_else(|| response.trim().to_string());

    let (program_code, language) = match extract_fenced_block(response, "python") {
        Some(code) => (code, Language::Python),
        None => (String::new(), Language::Lean),
    };

    Artifact::new(program_code, proof_script, language)
}

#[async_trait]
impl ProposalSource for LlmProposalSource {
    async fn propose(
        &self,
        spec: &LogicalSpec,
        history: &[HistoryEntry],
    ) -> DomainResult<Artifact> {
        let prompt = build_refinement_prompt(spec, history);
        debug!(
            theorem = %spec.theorem_name,
            history_len = history.len(),
            "Sampling candidate"
        );

        let response = match self.backend.complete(SYNTHESIZER_SYSTEM_PROMPT, &prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Backend failed, falling back to simulated response");
                self.fallback
                    .complete(SYNTHESIZER_SYSTEM_PROMPT, &prompt)
                    .await
                    .map_err(|e| SynthesisError::Proposal(e.to_string()))?
            }
        };

        Ok(parse_artifact(&response))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::client::LlmError;

    fn spec() -> LogicalSpec {
        LogicalSpec {
            theorem_name: "T_Correctness".to_string(),
            verifier_source: "theorem T_Correctness : True := by\n  sorry".to_string(),
            imports: vec![],
        }
    }

    #[tokio::test]
    async fn parses_both_blocks_from_canned_response() {
        let source = LlmProposalSource::new(Arc::new(SimulatedBackend::new()));
        let artifact = source.propose(&spec(), &[]).await.unwrap();
        assert_eq!(artifact.language, Language::Python);
        assert!(artifact.program_code.contains("class VerifiedStream"));
        assert!(artifact.proof_script.contains("intro trace"));
    }

    #[tokio::test]
    async fn unfenced_response_becomes_bare_proof() {
        let backend = SimulatedBackend::with_scripted_responses(vec![
            "intro trace\nsimp".to_string(),
        ]);
        let source = LlmProposalSource::new(Arc::new(backend));
        let artifact = source.propose(&spec(), &[]).await.unwrap();
        assert_eq!(artifact.language, Language::Lean);
        assert!(artifact.program_code.is_empty());
        assert_eq!(artifact.proof_script, "intro trace\nsimp");
    }

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::NetworkError("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_simulation() {
        let source = LlmProposalSource::new(Arc::new(FailingBackend));
        let artifact = source.propose(&spec(), &[]).await.unwrap();
        // The simulated proposal was served instead of an error.
        assert!(artifact.proof_script.contains("intro trace"));
    }
}
