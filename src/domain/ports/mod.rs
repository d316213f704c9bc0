//! Port traits for the engine's collaborator seams.

pub mod embedder;
pub mod formalizer;
pub mod oracle;
pub mod proposal_source;

pub use embedder::Embedder;
pub use formalizer::Formalizer;
pub use oracle::Oracle;
pub use proposal_source::ProposalSource;
