//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_refinement_steps: {0}. Must be at least 1")]
    InvalidMaxRefinementSteps(u32),

    #[error("Invalid timeout_per_verification_secs: {0}. Must be at least 1")]
    InvalidVerificationTimeout(u64),

    #[error("Invalid backoff_factor: {0}. Must be greater than 1.0")]
    InvalidBackoffFactor(f64),

    #[error("Verifier workspace cannot be empty")]
    EmptyWorkspace,

    #[error("Checker program cannot be empty")]
    EmptyCheckerProgram,

    #[error("Verifier target_file cannot be empty")]
    EmptyTargetFile,

    #[error("Invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Live backend enabled but no API key configured")]
    MissingApiKey,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .prooforge/config.yaml (project config)
    /// 3. .prooforge/local.yaml (project local overrides, optional)
    /// 4. Environment variables (`PROOFORGE_`* prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.prooforge/) so that
    /// multiple synthesis workspaces can coexist on one machine.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".prooforge/config.yaml"))
            .merge(Yaml::file(".prooforge/local.yaml"))
            .merge(Env::prefixed("PROOFORGE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Refinement loop bounds
        if config.refinement.max_refinement_steps == 0 {
            return Err(ConfigError::InvalidMaxRefinementSteps(
                config.refinement.max_refinement_steps,
            ));
        }

        if config.refinement.timeout_per_verification_secs == 0 {
            return Err(ConfigError::InvalidVerificationTimeout(
                config.refinement.timeout_per_verification_secs,
            ));
        }

        if config.refinement.backoff_factor <= 1.0 {
            return Err(ConfigError::InvalidBackoffFactor(
                config.refinement.backoff_factor,
            ));
        }

        // Verifier config
        if config.verifier.workspace.is_empty() {
            return Err(ConfigError::EmptyWorkspace);
        }

        if config.verifier.program.is_empty() {
            return Err(ConfigError::EmptyCheckerProgram);
        }

        if config.verifier.target_file.is_empty() {
            return Err(ConfigError::EmptyTargetFile);
        }

        // Sampler config
        if !(0.0..=1.0).contains(&config.sampler.temperature) {
            return Err(ConfigError::InvalidTemperature(config.sampler.temperature));
        }

        if config.sampler.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(config.sampler.max_tokens));
        }

        if config.sampler.use_live_backend && config.sampler.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        // Logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn zero_steps_rejected() {
        let mut config = Config::default();
        config.refinement.max_refinement_steps = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxRefinementSteps(0))
        ));
    }

    #[test]
    fn backoff_factor_must_exceed_one() {
        let mut config = Config::default();
        config.refinement.backoff_factor = 1.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoffFactor(_))
        ));
    }

    #[test]
    fn live_backend_requires_api_key() {
        let mut config = Config::default();
        config.sampler.use_live_backend = true;
        config.sampler.api_key = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn bogus_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn load_from_yaml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "refinement:\n  max_refinement_steps: 3\nverifier:\n  program: \"echo\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.refinement.max_refinement_steps, 3);
        assert_eq!(config.verifier.program, "echo");
        // Untouched fields keep their defaults.
        assert_eq!(config.verifier.args, vec!["build".to_string()]);
    }
}
