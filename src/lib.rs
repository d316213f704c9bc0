//! Prooforge - Verifier-Guided Proof Synthesis Engine
//!
//! Prooforge turns a natural-language intent into a candidate implementation
//! plus machine-checked correctness proof by iterating a bounded refinement
//! loop: sample a candidate from a stochastic proposal source, check it with
//! an external deterministic verifier, classify the feedback, and re-prompt.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): data model, error taxonomy, and the port
//!   traits for the engine's collaborators
//! - **Service Layer** (`services`): the refinement engine core — orchestrator,
//!   verification oracle, feedback classifier, convergence potential
//! - **Infrastructure Layer** (`infrastructure`): chat-completion backends,
//!   the template embedder, and configuration loading
//!
//! # Example
//!
//! ```ignore
//! use prooforge::services::RefinementEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Wire collaborators, then:
//!     // let artifact = engine.solve("a bounded queue that never drops").await?;
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Artifact, Config, HistoryEntry, Language, LogicalSpec, RefinementConfig, SamplerConfig,
    Status, SynthesisLog, TraceSpec, VerificationResult, VerifierConfig,
};
pub use domain::ports::{Embedder, Formalizer, Oracle, ProposalSource};
pub use domain::{DomainResult, SynthesisError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CheckerOracle, FeedbackClassifier, PotentialCalculator, RefinementEngine};
