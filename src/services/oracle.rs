//! Verification oracle: candidate -> external checker -> structured result.
//!
//! Materializes one self-contained source unit per verification at a fixed
//! location inside the workspace, runs the configured checker command against
//! it under a timeout, and delegates the captured output to the
//! [`FeedbackClassifier`]. Every failure mode short of that delegation (I/O,
//! spawn, timeout) is converted into an `ErrTool` result; `verify` never
//! errors.
//!
//! The workspace supports at most one in-flight verification: the source unit
//! is overwritten on every call. Concurrent solve sessions need one workspace
//! each.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::domain::models::{Artifact, Language, LogicalSpec, VerificationResult, VerifierConfig};
use crate::domain::ports::Oracle;
use crate::services::classifier::FeedbackClassifier;

/// Marker splitting a theorem statement from its tactic block.
const PROOF_BLOCK_MARKER: &str = ":= by";

/// Oracle backed by an external checker subprocess (`lake build` by default).
pub struct CheckerOracle {
    config: VerifierConfig,
    classifier: FeedbackClassifier,
}

impl CheckerOracle {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config,
            classifier: FeedbackClassifier::new(),
        }
    }

    /// Absolute-or-relative path of the source unit inside the workspace.
    fn target_path(&self) -> PathBuf {
        PathBuf::from(&self.config.workspace).join(&self.config.target_file)
    }

    async fn write_source_unit(&self, content: &str) -> std::io::Result<()> {
        let path = self.target_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await
    }
}

/// Combine imports, candidate definitions, and the theorem statement with its
/// proof hole replaced by the candidate's tactic script into one compilable
/// source unit.
pub fn render_source_unit(spec: &LogicalSpec, candidate: &Artifact) -> String {
    let imports = spec
        .imports
        .iter()
        .map(|module| format!("import {module}"))
        .collect::<Vec<_>>()
        .join("\n");

    // Everything before the tactic block survives; the admitted obligation
    // after it is replaced wholesale by the candidate proof.
    let statement = spec
        .verifier_source
        .split(PROOF_BLOCK_MARKER)
        .next()
        .unwrap_or(&spec.verifier_source)
        .trim_end();

    let proof = indent_lines(candidate.proof_script.trim(), "  ");

    let mut unit = String::new();
    unit.push_str(&imports);
    unit.push_str("\n\n");
    // Supporting definitions are only compilable when they are in the
    // checker's own language; foreign-language implementations are modeled by
    // the proof script alone.
    if candidate.language == Language::Lean && !candidate.program_code.trim().is_empty() {
        unit.push_str(candidate.program_code.trim());
        unit.push_str("\n\n");
    }
    unit.push_str(statement);
    unit.push_str(" := by\n");
    unit.push_str(&proof);
    unit.push('\n');
    unit
}

fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Oracle for CheckerOracle {
    async fn verify(
        &self,
        spec: &LogicalSpec,
        candidate: &Artifact,
        timeout: Duration,
    ) -> VerificationResult {
        debug!(theorem = %spec.theorem_name, "Materializing source unit");

        let source = render_source_unit(spec, candidate);
        if let Err(e) = self.write_source_unit(&source).await {
            error!(error = %e, path = %self.target_path().display(), "Failed to write source unit");
            return VerificationResult::tool_failure(
                "IO Error",
                "System error: could not write the source unit.",
                e.to_string(),
            );
        }

        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .current_dir(&self.config.workspace)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let started = Instant::now();
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Err(_) => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "Verification timed out; killing checker"
                );
                return VerificationResult::tool_failure(
                    "Timeout",
                    "The verification process timed out. The proof may be inefficient or looping.",
                    format!("checker timed out after {}s", timeout.as_secs()),
                );
            }
            Ok(Err(e)) => {
                error!(error = %e, program = %self.config.program, "Failed to spawn checker");
                return VerificationResult::tool_failure(
                    "Subprocess Error",
                    format!("System error: {e}"),
                    e.to_string(),
                );
            }
            Ok(Ok(output)) => output,
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            exit_code = ?output.status.code(),
            "Checker finished"
        );

        self.classifier.classify(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            output.status.code(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Language, Status};

    fn spec() -> LogicalSpec {
        LogicalSpec {
            theorem_name: "Stream_Correctness".to_string(),
            verifier_source:
                "theorem Stream_Correctness (trace : List State) :\n  True := by\n  sorry\n"
                    .to_string(),
            imports: vec!["Prooforge.Trace".to_string(), "Prooforge.Ltl".to_string()],
        }
    }

    fn candidate() -> Artifact {
        Artifact::new(
            "def process (s : State) : State := s",
            "intro t\nsimp",
            Language::Lean,
        )
    }

    fn oracle_with(program: &str, args: &[&str], workspace: &str) -> CheckerOracle {
        CheckerOracle::new(VerifierConfig {
            workspace: workspace.to_string(),
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            target_file: "Main.lean".to_string(),
        })
    }

    #[test]
    fn source_unit_replaces_proof_hole() {
        let unit = render_source_unit(&spec(), &candidate());
        assert!(unit.starts_with("import Prooforge.Trace\nimport Prooforge.Ltl\n"));
        assert!(unit.contains("def process (s : State) : State := s"));
        assert!(unit.contains(":= by\n  intro t\n  simp\n"));
        assert!(!unit.contains("sorry"));
    }

    #[test]
    fn source_unit_without_program_definitions() {
        let mut artifact = candidate();
        artifact.program_code = String::new();
        let unit = render_source_unit(&spec(), &artifact);
        assert!(!unit.contains("def process"));
        assert!(unit.contains("theorem Stream_Correctness"));
    }

    #[test]
    fn foreign_language_definitions_stay_out_of_the_unit() {
        let artifact = Artifact::new(
            "class VerifiedStream: ...",
            "intro t\nsimp",
            Language::Python,
        );
        let unit = render_source_unit(&spec(), &artifact);
        assert!(!unit.contains("class VerifiedStream"));
        assert!(unit.contains(":= by\n  intro t"));
    }

    #[tokio::test]
    async fn accepting_checker_yields_ok() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = oracle_with("true", &[], dir.path().to_str().unwrap());
        let result = oracle
            .verify(&spec(), &candidate(), Duration::from_secs(5))
            .await;
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.unsolved_goal_count, 0);
        // The source unit was materialized in the workspace.
        assert!(dir.path().join("Main.lean").exists());
    }

    #[tokio::test]
    async fn failing_checker_output_reaches_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = oracle_with(
            "sh",
            &["-c", "echo 'error: unsolved goals'; echo 'case g1'; exit 1"],
            dir.path().to_str().unwrap(),
        );
        let result = oracle
            .verify(&spec(), &candidate(), Duration::from_secs(5))
            .await;
        assert_eq!(result.status, Status::ErrLogical);
        assert_eq!(result.unsolved_goal_count, 1);
    }

    #[tokio::test]
    async fn slow_checker_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = oracle_with("sleep", &["5"], dir.path().to_str().unwrap());
        let result = oracle
            .verify(&spec(), &candidate(), Duration::from_millis(100))
            .await;
        assert_eq!(result.status, Status::ErrTool);
        assert_eq!(result.summary, "Timeout");
    }

    #[tokio::test]
    async fn missing_checker_is_subprocess_error() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = oracle_with(
            "prooforge-no-such-checker",
            &[],
            dir.path().to_str().unwrap(),
        );
        let result = oracle
            .verify(&spec(), &candidate(), Duration::from_secs(5))
            .await;
        assert_eq!(result.status, Status::ErrTool);
        assert_eq!(result.summary, "Subprocess Error");
    }

    #[tokio::test]
    async fn unwritable_workspace_is_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A path component that is a regular file makes directory creation
        // fail before any subprocess is spawned.
        let workspace = file.path().join("nested");
        let oracle = oracle_with("true", &[], workspace.to_str().unwrap());
        let result = oracle
            .verify(&spec(), &candidate(), Duration::from_secs(5))
            .await;
        assert_eq!(result.status, Status::ErrTool);
        assert_eq!(result.summary, "IO Error");
    }
}
