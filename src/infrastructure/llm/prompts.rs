//! Prompt construction and response parsing.
//!
//! Role-specific prompts are built by pure functions over the domain models;
//! the backends stay role-agnostic text-completion capabilities.

use crate::domain::models::{HistoryEntry, LogicalSpec};

/// System prompt for the formalizer role.
pub const FORMALIZER_SYSTEM_PROMPT: &str =
    "You are a formal specification expert. You extract precise behavioral \
     properties from informal requirements.";

/// System prompt for the synthesizer role.
pub const SYNTHESIZER_SYSTEM_PROMPT: &str =
    "You are a proof engineer. You produce implementations together with \
     machine-checkable correctness proofs.";

/// History entries quoted back to the synthesizer. Older feedback is dropped
/// to keep the prompt bounded.
const HISTORY_WINDOW: usize = 3;

/// Build the formalizer prompt for an intent.
pub fn build_formalizer_prompt(intent: &str) -> String {
    format!(
        "Given the following requirements, extract the key formal properties.\n\
         \n\
         Requirements:\n\
         {intent}\n\
         \n\
         List each property on its own line as `<Kind>: <definition>`, where\n\
         Kind is one of Mono, Live, Safe, Consist. Examples:\n\
         Mono: processed values are non-decreasing\n\
         Safe: the queue never exceeds its configured bound\n"
    )
}

/// Build the refinement prompt for a proposal, conditioned on the history
/// snapshot.
pub fn build_refinement_prompt(spec: &LogicalSpec, history: &[HistoryEntry]) -> String {
    let mut prompt = format!(
        "Prove the following theorem.\n\
         \n\
         {}\n\
         \n",
        spec.verifier_source.trim()
    );

    if !history.is_empty() {
        prompt.push_str("Previous attempts were rejected. Recent feedback, oldest first:\n");
        let skip = history.len().saturating_sub(HISTORY_WINDOW);
        for entry in &history[skip..] {
            prompt.push_str(&format!(
                "- Attempt {}: {}\n",
                entry.step_index, entry.feedback
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Respond with the implementation in a ```python code block and the \
         tactic proof in a ```lean code block. Do not admit goals.\n",
    );
    prompt
}

/// Parse `"<Kind>: <definition>"` predicate lines out of a formalizer
/// response. Bullet markers are tolerated; anything without a one-word
/// alphabetic kind prefix is skipped.
pub fn parse_predicate_lines(response: &str) -> Vec<String> {
    let mut predicates = Vec::new();

    for line in response.lines() {
        let trimmed = line.trim().trim_start_matches(['-', '*', ' ']);
        let Some((kind, definition)) = trimmed.split_once(':') else {
            continue;
        };
        let kind = kind.trim();
        let definition = definition.trim();
        if kind.is_empty()
            || definition.is_empty()
            || !kind.chars().all(char::is_alphabetic)
        {
            continue;
        }
        predicates.push(format!("{kind}: {definition}"));
    }

    predicates
}

/// Derive a stable specification name from an intent: the first few words,
/// capitalized and concatenated.
pub fn spec_name_from_intent(intent: &str) -> String {
    let name: String = intent
        .split_whitespace()
        .filter_map(|word| {
            let cleaned: String = word.chars().filter(char::is_ascii_alphanumeric).collect();
            if cleaned.is_empty() {
                None
            } else {
                let mut chars = cleaned.chars();
                let head = chars.next().map(|c| c.to_ascii_uppercase());
                head.map(|h| format!("{h}{}", chars.as_str()))
            }
        })
        .take(4)
        .collect();

    if name.is_empty() {
        "Intent".to_string()
    } else {
        name
    }
}

/// Extract the body of the first fenced code block tagged with `lang`.
pub fn extract_fenced_block(text: &str, lang: &str) -> Option<String> {
    let fence = format!("```{lang}");
    let start = text.find(&fence)?;
    let rest = &text[start + fence.len()..];
    // Skip the remainder of the fence line.
    let body = &rest[rest.find('\n')? + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim_end().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Artifact, Language};

    #[test]
    fn predicate_lines_are_parsed_and_normalized() {
        let response = "Here are the properties:\n\
                        - Mono: values are non-decreasing\n\
                        Safe : queue bounded\n\
                        not a predicate line\n\
                        123: numeric kind is skipped\n";
        let predicates = parse_predicate_lines(response);
        assert_eq!(
            predicates,
            vec![
                "Mono: values are non-decreasing".to_string(),
                "Safe: queue bounded".to_string(),
            ]
        );
    }

    #[test]
    fn spec_name_concatenates_leading_words() {
        assert_eq!(
            spec_name_from_intent("a speculative stream processor with retries"),
            "ASpeculativeStreamProcessor"
        );
        assert_eq!(spec_name_from_intent("  "), "Intent");
    }

    #[test]
    fn fenced_block_extraction() {
        let text = "preamble\n```lean\nintro t\nsimp\n```\ntrailer";
        assert_eq!(
            extract_fenced_block(text, "lean"),
            Some("intro t\nsimp".to_string())
        );
        assert_eq!(extract_fenced_block(text, "python"), None);
    }

    #[test]
    fn unterminated_fence_yields_nothing() {
        assert_eq!(extract_fenced_block("```lean\nintro t", "lean"), None);
    }

    #[test]
    fn refinement_prompt_windows_history() {
        let spec = LogicalSpec {
            theorem_name: "T".to_string(),
            verifier_source: "theorem T : True := by\n  sorry".to_string(),
            imports: vec![],
        };
        let artifact = Artifact::new("", "sorry", Language::Lean);
        let history: Vec<HistoryEntry> = (0..5)
            .map(|i| HistoryEntry::logical(i, artifact.clone(), format!("feedback {i}"), ""))
            .collect();

        let prompt = build_refinement_prompt(&spec, &history);
        assert!(!prompt.contains("feedback 0"));
        assert!(!prompt.contains("feedback 1"));
        assert!(prompt.contains("feedback 2"));
        assert!(prompt.contains("feedback 4"));
    }

    #[test]
    fn first_prompt_has_no_feedback_section() {
        let spec = LogicalSpec {
            theorem_name: "T".to_string(),
            verifier_source: "theorem T : True := by\n  sorry".to_string(),
            imports: vec![],
        };
        let prompt = build_refinement_prompt(&spec, &[]);
        assert!(!prompt.contains("Previous attempts"));
        assert!(prompt.contains("theorem T"));
    }
}
