//! Domain models shared by all components.

pub mod artifact;
pub mod config;
pub mod history;
pub mod spec;
pub mod verification;

pub use artifact::{Artifact, Language};
pub use config::{Config, LoggingConfig, RefinementConfig, SamplerConfig, VerifierConfig};
pub use history::{HistoryEntry, SynthesisLog};
pub use spec::{LogicalSpec, TraceSpec, ADMITTED_MARKER};
pub use verification::{Status, VerificationResult};
