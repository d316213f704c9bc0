//! End-to-end pipeline tests: simulated backend, template embedder, and a
//! real checker subprocess (shell stubs standing in for the proof checker).

use std::sync::Arc;

use prooforge::domain::models::{RefinementConfig, VerifierConfig};
use prooforge::infrastructure::embedding::TemplateEmbedder;
use prooforge::infrastructure::llm::{LlmFormalizer, LlmProposalSource, SimulatedBackend};
use prooforge::services::{CheckerOracle, RefinementEngine};

fn engine_for(workspace: &str, program: &str, args: &[&str]) -> RefinementEngine {
    let backend = Arc::new(SimulatedBackend::new());
    RefinementEngine::new(
        RefinementConfig {
            max_refinement_steps: 3,
            timeout_per_verification_secs: 5,
            backoff_factor: 1.5,
        },
        Arc::new(LlmFormalizer::new(backend.clone())),
        Arc::new(TemplateEmbedder::new()),
        Arc::new(LlmProposalSource::new(backend)),
        Arc::new(CheckerOracle::new(VerifierConfig {
            workspace: workspace.to_string(),
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            target_file: "Main.lean".to_string(),
        })),
    )
}

#[tokio::test]
async fn accepting_checker_produces_artifact_first_try() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_for(dir.path().to_str().unwrap(), "true", &[]);

    let artifact = engine.solve("a speculative stream processor").await.unwrap();
    let artifact = artifact.expect("accepting checker should yield an artifact");
    assert!(artifact.proof_script.contains("intro trace"));

    // One iteration, accepted: the source unit is on disk, goals are zero.
    assert_eq!(engine.metrics().len(), 1);
    assert_eq!(engine.metrics().unsolved_goals, vec![0]);
    let unit = std::fs::read_to_string(dir.path().join("Main.lean")).unwrap();
    assert!(unit.contains("theorem ASpeculativeStreamProcessor_Correctness"));
    assert!(unit.contains(":= by"));
}

#[tokio::test]
async fn rejection_then_acceptance_takes_two_iterations() {
    let dir = tempfile::tempdir().unwrap();
    // First invocation rejects with a goal listing and leaves a marker;
    // second invocation sees the marker and accepts.
    let script = "if [ -f accepted ]; then exit 0; else \
                  touch accepted; echo 'error: unsolved goals'; echo 'case g1'; exit 1; fi";
    let mut engine = engine_for(dir.path().to_str().unwrap(), "sh", &["-c", script]);

    let artifact = engine.solve("a speculative stream processor").await.unwrap();
    assert!(artifact.is_some());
    assert_eq!(engine.metrics().len(), 2);
    assert_eq!(engine.metrics().unsolved_goals, vec![1, 0]);
}

#[tokio::test]
async fn rejecting_checker_exhausts_budget() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_for(
        dir.path().to_str().unwrap(),
        "sh",
        &["-c", "echo 'error: type mismatch'; exit 1"],
    );

    let outcome = engine.solve("a speculative stream processor").await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(engine.metrics().len(), 3);
    assert!(engine.metrics().events.iter().any(|e| e == "failure"));
}
