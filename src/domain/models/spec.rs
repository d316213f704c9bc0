//! Specification models.
//!
//! Two read-only records flow through a synthesis run:
//!
//! - [`TraceSpec`] — the behavioral specification extracted from the user's
//!   natural-language intent: a name plus an ordered list of raw predicate
//!   strings of the informal shape `"<Kind>: <free-text definition>"`.
//! - [`LogicalSpec`] — the formal theorem derived from a [`TraceSpec`]:
//!   checker-ready source text containing an unresolved proof obligation,
//!   plus the imports the source unit needs.
//!
//! Both are created once per solve call and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// The reserved token marking an admitted (unresolved) proof obligation in
/// checker source. The verification oracle replaces the obligation with the
/// candidate's proof script; the potential calculator counts occurrences that
/// survive in candidate proofs.
pub const ADMITTED_MARKER: &str = "sorry";

/// A named set of informal behavioral predicates extracted from an intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TraceSpec {
    /// Stable name for the specification, used to derive the theorem name.
    pub name: String,

    /// Raw predicate strings, `"<Kind>: <free-text definition>"`.
    pub predicates: Vec<String>,
}

impl TraceSpec {
    /// Create a new trace specification.
    pub fn new(name: impl Into<String>, predicates: Vec<String>) -> Self {
        Self {
            name: name.into(),
            predicates,
        }
    }
}

/// A formal theorem statement with an unresolved proof obligation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LogicalSpec {
    /// Name of the generated theorem.
    pub theorem_name: String,

    /// Checker source containing the theorem statement and an
    /// [`ADMITTED_MARKER`] proof hole.
    pub verifier_source: String,

    /// Modules the source unit must import.
    pub imports: Vec<String>,
}
