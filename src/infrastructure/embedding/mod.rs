//! Template embedder: behavioral predicates -> checker theorem.
//!
//! Expands known predicate kinds into terms of the checker-side support
//! library, conjoins them, and wraps the conjunction in a theorem statement
//! with an admitted proof obligation. Theorem names are derived
//! deterministically from the spec name so repeated runs stay stable.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{LogicalSpec, TraceSpec};
use crate::domain::ports::Embedder;

/// Known predicate kinds and their checker-library expansions.
const PREDICATE_TEMPLATES: &[(&str, &str)] = &[
    ("Mono", "Trace.isMonotonic trace (fun s => s.val)"),
    ("Live", "Ltl.eventually (fun s => s.responseReceived) trace"),
    ("Safe", "Ltl.always (fun s => s.queueSize <= 10) trace"),
    ("Consist", "Trace.linearizable trace"),
];

/// Modules every generated source unit imports.
const SPEC_IMPORTS: &[&str] = &["Prooforge.Trace", "Prooforge.Ltl"];

/// Shared preamble: the state type the predicates quantify over.
const SOURCE_HEADER: &str = "\
open Prooforge

structure State where
  val : Nat
  queueSize : Nat
  responseReceived : Bool
  deriving Repr, DecidableEq
";

/// Deterministic template-based embedder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEmbedder;

impl TemplateEmbedder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Embedder for TemplateEmbedder {
    async fn embed(&self, spec: &TraceSpec) -> DomainResult<LogicalSpec> {
        let theorem_name = format!("{}_Correctness", spec.name);

        let mut propositions = Vec::new();
        for raw in &spec.predicates {
            let Some((kind, _)) = raw.split_once(':') else {
                propositions.push(format!("-- Unparsed: {raw}"));
                continue;
            };
            let kind = kind.trim();
            match PREDICATE_TEMPLATES
                .iter()
                .find(|(name, _)| *name == kind)
            {
                Some((_, template)) => propositions.push((*template).to_string()),
                None => {
                    warn!(kind, "Unknown predicate kind, embedding as comment");
                    propositions.push(format!("-- Custom property: {raw}"));
                }
            }
        }

        let conjunction = if propositions.is_empty() {
            "True".to_string()
        } else {
            propositions.join(" ∧ ")
        };

        let verifier_source = format!(
            "{SOURCE_HEADER}\n\
             theorem {theorem_name} (trace : List State) :\n  \
             {conjunction} := by\n  \
             sorry\n"
        );

        debug!(theorem = %theorem_name, "Generated verifier source");

        Ok(LogicalSpec {
            theorem_name,
            verifier_source,
            imports: SPEC_IMPORTS.iter().map(ToString::to_string).collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
