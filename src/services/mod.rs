//! Service layer: the refinement engine core.

pub mod classifier;
pub mod engine;
pub mod oracle;
pub mod potential;

pub use classifier::FeedbackClassifier;
pub use engine::RefinementEngine;
pub use oracle::CheckerOracle;
pub use potential::{PotentialCalculator, PotentialWeights};
