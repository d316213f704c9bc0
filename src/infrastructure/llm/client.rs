//! Chat-completion backend abstraction and the live HTTP client.
//!
//! The live client speaks the Anthropic messages API. Backend selection (live
//! vs simulated) is decided once from [`SamplerConfig::use_live_backend`] by
//! the caller that constructs the collaborators — request logic never probes
//! the environment.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::domain::models::SamplerConfig;

/// Error types for chat-completion backends
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Invalid API key")]
    AuthError,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A stochastic text-completion capability.
///
/// Implementations must be `Send + Sync` for concurrent use across tokio
/// tasks.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sample one completion for the given system prompt and user prompt.
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Live HTTP chat-completion client.
pub struct ChatClient {
    http: reqwest::Client,
    config: SamplerConfig,
}

impl ChatClient {
    /// Create a new client. Fails when no API key is configured or the HTTP
    /// client cannot be constructed.
    pub fn new(config: SamplerConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::InvalidConfig(
                "api_key is empty; set sampler.api_key or ANTHROPIC_API_KEY".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::InvalidConfig(e.to_string()))?;

        Ok(Self { http, config })
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [{"role": "user", "content": prompt}],
        });

        debug!(model = %self.config.model, "Sending completion request");

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LlmError::AuthError);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::RateLimitExceeded(text));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!("{status}: {text}")));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(LlmError::MalformedResponse(
                "response contained no text content".to_string(),
            ));
        }

        debug!(chars = text.len(), "Received completion");
        Ok(text)
    }
}
