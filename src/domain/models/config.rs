use serde::{Deserialize, Serialize};

/// Main configuration structure for Prooforge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Refinement loop configuration
    #[serde(default)]
    pub refinement: RefinementConfig,

    /// Verification oracle configuration
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Sampling source configuration
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Refinement loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefinementConfig {
    /// Upper bound on loop iterations per solve call
    #[serde(default = "default_max_refinement_steps")]
    pub max_refinement_steps: u32,

    /// Per-verification timeout in seconds
    #[serde(default = "default_timeout_per_verification_secs")]
    pub timeout_per_verification_secs: u64,

    /// Exponential base for the tool-error backoff delay (must be > 1.0)
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

const fn default_max_refinement_steps() -> u32 {
    15
}

const fn default_timeout_per_verification_secs() -> u64 {
    30
}

const fn default_backoff_factor() -> f64 {
    1.5
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_refinement_steps: default_max_refinement_steps(),
            timeout_per_verification_secs: default_timeout_per_verification_secs(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

/// Verification oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifierConfig {
    /// Workspace directory the checker runs in. One workspace supports at
    /// most one in-flight verification; concurrent solve sessions need one
    /// workspace each.
    #[serde(default = "default_workspace")]
    pub workspace: String,

    /// Checker executable
    #[serde(default = "default_checker_program")]
    pub program: String,

    /// Arguments passed to the checker
    #[serde(default = "default_checker_args")]
    pub args: Vec<String>,

    /// Source unit file, relative to the workspace. Overwritten on every
    /// verification.
    #[serde(default = "default_target_file")]
    pub target_file: String,
}

fn default_workspace() -> String {
    ".prooforge/workspace".to_string()
}

fn default_checker_program() -> String {
    "lake".to_string()
}

fn default_checker_args() -> Vec<String> {
    vec!["build".to_string()]
}

fn default_target_file() -> String {
    "Main.lean".to_string()
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            program: default_checker_program(),
            args: default_checker_args(),
            target_file: default_target_file(),
        }
    }
}

/// Sampling source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SamplerConfig {
    /// Model identifier for the chat-completion backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Use the live HTTP backend. When false, the deterministic simulated
    /// backend is used instead. Resolved once at configuration time, never
    /// probed inside request logic.
    #[serde(default)]
    pub use_live_backend: bool,

    /// API key for the live backend. Defaults to `ANTHROPIC_API_KEY` from the
    /// environment at load time.
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Base URL of the live backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    4096
}

fn default_api_key() -> String {
    std::env::var("ANTHROPIC_API_KEY").unwrap_or_default()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            use_live_backend: false,
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
