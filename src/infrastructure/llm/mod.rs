//! Chat-completion backends and the LLM-backed collaborators.

pub mod client;
pub mod formalizer;
pub mod prompts;
pub mod sampler;
pub mod simulated;

use std::sync::Arc;

use crate::domain::models::SamplerConfig;

pub use client::{ChatBackend, ChatClient, LlmError};
pub use formalizer::LlmFormalizer;
pub use sampler::LlmProposalSource;
pub use simulated::SimulatedBackend;

/// Resolve the chat backend from configuration, once, at wiring time.
pub fn backend_from_config(config: &SamplerConfig) -> Result<Arc<dyn ChatBackend>, LlmError> {
    if config.use_live_backend {
        Ok(Arc::new(ChatClient::new(config.clone())?))
    } else {
        Ok(Arc::new(SimulatedBackend::new()))
    }
}
