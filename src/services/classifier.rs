//! Feedback classifier: raw checker output -> structured verification result.
//!
//! Maps the stdout/stderr/exit-status triple of the external checker to one
//! of the three outcome kinds and extracts a bounded natural-language
//! explanation for the sampling source.
//!
//! Classification runs in strict priority order: success, then tool-failure
//! indicators, then logical-error analysis. Tool indicators are checked
//! before any logical-error parsing so that transient or environmental
//! failures are never fed back to the sampling source as "fix your proof"
//! instructions.

use crate::domain::models::{Status, VerificationResult};

/// Maximum characters of proof-state snippet fed back to the sampling source.
const PROOF_STATE_LIMIT: usize = 1000;

/// Characters of raw log tail used when no structured extraction succeeds.
const RAW_TAIL_LIMIT: usize = 800;

// ---------------------------------------------------------------------------
// Tool-failure rules
// ---------------------------------------------------------------------------

/// One tool-failure signature: indicator substrings (matched against the
/// lowercased combined output) plus the summary and feedback to report.
struct ToolErrorRule {
    indicators: &'static [&'static str],
    summary: &'static str,
    feedback: &'static str,
}

/// Ordered rule set, evaluated first-match-wins. New signatures are added
/// here without touching the classification control flow.
const TOOL_ERROR_RULES: &[ToolErrorRule] = &[
    ToolErrorRule {
        indicators: &["timeout", "deadline"],
        summary: "Timeout",
        feedback: "The verifier timed out. The proof may be inefficient or looping.",
    },
    ToolErrorRule {
        indicators: &["out of memory", "segmentation fault"],
        summary: "Resource Exhaustion",
        feedback: "The verifier ran out of system resources.",
    },
    ToolErrorRule {
        indicators: &["unknown package", "no such file"],
        summary: "Environment Error",
        feedback: "Missing imports or dependency configuration error.",
    },
];

// ---------------------------------------------------------------------------
// FeedbackClassifier
// ---------------------------------------------------------------------------

/// Classifies raw checker process output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackClassifier;

impl FeedbackClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Analyze process output and exit status to determine the verification
    /// outcome.
    ///
    /// `exit_code` is `None` when the process was terminated by a signal;
    /// only `Some(0)` counts as success.
    pub fn classify(
        &self,
        stdout: &str,
        stderr: &str,
        exit_code: Option<i32>,
    ) -> VerificationResult {
        let full_output = format!("{stdout}\n{stderr}").trim().to_string();

        // Case 1: success.
        if exit_code == Some(0) {
            return VerificationResult::success(stdout, stderr);
        }

        // Case 2: tool failures, by indicator rule priority.
        let lower = full_output.to_lowercase();
        for rule in TOOL_ERROR_RULES {
            if rule.indicators.iter().any(|ind| lower.contains(ind)) {
                return VerificationResult::tool_failure(rule.summary, rule.feedback, stderr);
            }
        }

        // Case 3: logical errors the sampling source must fix.
        let unsolved_goals = count_unsolved_goals(&full_output);
        let feedback = extract_error_context(&full_output);
        let label = summary_label(&lower);

        VerificationResult {
            status: Status::ErrLogical,
            summary: format!("{label} ({unsolved_goals} goals left)"),
            feedback,
            raw_stdout: stdout.to_string(),
            raw_stderr: stderr.to_string(),
            unsolved_goal_count: unsolved_goals,
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction helpers
// ---------------------------------------------------------------------------

/// Estimate the number of remaining proof obligations.
///
/// The checker lists one `case ...` block per open goal under an
/// "unsolved goals" banner; without the banner any error still counts as one
/// obligation.
fn count_unsolved_goals(output: &str) -> u32 {
    if output.contains("unsolved goals") {
        let case_count = u32::try_from(output.matches("case ").count()).unwrap_or(u32::MAX);
        case_count.max(1)
    } else {
        1
    }
}

/// Derive the logical-error summary label from the lowercased output.
fn summary_label(lower: &str) -> &'static str {
    if lower.contains("tactic") && lower.contains("failed") {
        "Tactic Failure"
    } else if lower.contains("type mismatch") {
        "Type Mismatch"
    } else if lower.contains("unknown identifier") {
        "Syntax/Scope Error"
    } else {
        "Logical Error"
    }
}

/// Extract the most semantically relevant slice of the error log.
///
/// Keeps the sampling source's context window free of noise: the first
/// compiler error line, the proof state under the "unsolved goals" banner
/// (truncated), and only as a last resort the raw tail of the log.
fn extract_error_context(output: &str) -> String {
    let mut pieces = Vec::new();

    // The first line carrying an "error:" marker.
    if let Some(idx) = find_ascii_ci(output, "error:") {
        let rest = &output[idx + "error:".len()..];
        let message = rest.lines().next().unwrap_or("").trim();
        pieces.push(format!("Compiler Error: {message}"));
    }

    // The proof state printed under the "unsolved goals" banner, up to the
    // next blank line.
    if let Some(pos) = output.find("unsolved goals") {
        let rest = &output[pos + "unsolved goals".len()..];
        if let Some(tail) = rest.strip_prefix('\n') {
            let block = tail.split("\n\n").next().unwrap_or(tail).trim();
            if !block.is_empty() {
                let snippet = truncate_chars(block, PROOF_STATE_LIMIT);
                pieces.push(format!("Proof State at Failure:\n{snippet}"));
            }
        }
    }

    // Fallback: the tail of the log.
    if pieces.is_empty() {
        let snippet = tail_chars(output, RAW_TAIL_LIMIT);
        pieces.push(format!("Raw Output Tail:\n{}", snippet.trim()));
    }

    pieces.join("\n")
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    h.windows(n.len()).position(|w| w.eq_ignore_ascii_case(n))
}

/// Truncate to `limit` characters, appending a truncation marker if cut.
fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(limit).collect();
        format!("{truncated}... [truncated]")
    }
}

/// Last `limit` characters of `s`.
fn tail_chars(s: &str, limit: usize) -> &str {
    let count = s.chars().count();
    if count <= limit {
        s
    } else {
        let (idx, _) = s.char_indices().nth(count - limit).unwrap_or((0, ' '));
        &s[idx..]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
