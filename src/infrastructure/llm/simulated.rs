//! Simulated chat backend.
//!
//! Deterministic stand-in for the live backend: used when
//! `use_live_backend` is off, as the fallback when the live backend errors,
//! and as the scripted backend in tests. Never fails.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::debug;

use super::client::{ChatBackend, LlmError};
use super::prompts::FORMALIZER_SYSTEM_PROMPT;

/// Canned formalizer response: one predicate line per property kind.
const SIMULATED_PREDICATES: &str = "\
Mono: processed sequence values are non-decreasing
Safe: the queue never exceeds its configured bound
Live: every request eventually receives a response
";

/// Canned synthesizer response: implementation plus tactic proof.
const SIMULATED_PROPOSAL: &str = "\
Here is a candidate implementation and proof.

```python
class VerifiedStream:
    def process(self, state, event):
        return max(state, event)
```

```lean
intro trace
exact trivial
```
";

/// Deterministic chat backend with an optional scripted-response queue.
#[derive(Default)]
pub struct SimulatedBackend {
    scripted: Mutex<VecDeque<String>>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that serves the given responses in order before falling back
    /// to the canned ones.
    pub fn with_scripted_responses(responses: Vec<String>) -> Self {
        Self {
            scripted: Mutex::new(responses.into()),
        }
    }

    /// Queue one more scripted response.
    pub async fn push_response(&self, response: impl Into<String>) {
        self.scripted.lock().await.push_back(response.into());
    }
}

#[async_trait]
impl ChatBackend for SimulatedBackend {
    async fn complete(&self, system_prompt: &str, _prompt: &str) -> Result<String, LlmError> {
        if let Some(scripted) = self.scripted.lock().await.pop_front() {
            debug!("Serving scripted response");
            return Ok(scripted);
        }

        // Role is keyed off the system prompt; the simulated backend has no
        // other signal to distinguish callers.
        let canned = if system_prompt == FORMALIZER_SYSTEM_PROMPT {
            SIMULATED_PREDICATES
        } else {
            SIMULATED_PROPOSAL
        };
        Ok(canned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::prompts::SYNTHESIZER_SYSTEM_PROMPT;

    #[tokio::test]
    async fn scripted_responses_are_served_in_order() {
        let backend =
            SimulatedBackend::with_scripted_responses(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(backend.complete("sys", "p").await.unwrap(), "one");
        assert_eq!(backend.complete("sys", "p").await.unwrap(), "two");
        // Queue drained: canned response takes over.
        let canned = backend
            .complete(SYNTHESIZER_SYSTEM_PROMPT, "p")
            .await
            .unwrap();
        assert!(canned.contains("```lean"));
    }

    #[tokio::test]
    async fn role_selects_canned_response() {
        let backend = SimulatedBackend::new();
        let formalized = backend
            .complete(FORMALIZER_SYSTEM_PROMPT, "p")
            .await
            .unwrap();
        assert!(formalized.contains("Mono:"));
    }
}
