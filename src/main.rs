//! Prooforge CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prooforge::domain::models::Config;
use prooforge::infrastructure::config::ConfigLoader;
use prooforge::infrastructure::embedding::TemplateEmbedder;
use prooforge::infrastructure::llm::{backend_from_config, LlmFormalizer, LlmProposalSource};
use prooforge::services::{CheckerOracle, RefinementEngine};

#[derive(Parser)]
#[command(name = "prooforge", version, about = "Verifier-guided proof synthesis")]
struct Cli {
    /// Natural-language requirement to synthesize and verify
    intent: String,

    /// Load configuration from a specific file instead of .prooforge/
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the synthesized artifact as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    init_tracing(&config);

    let backend = backend_from_config(&config.sampler)?;
    let formalizer = Arc::new(LlmFormalizer::new(Arc::clone(&backend)));
    let embedder = Arc::new(TemplateEmbedder::new());
    let proposals = Arc::new(LlmProposalSource::new(backend));
    let oracle = Arc::new(CheckerOracle::new(config.verifier.clone()));

    let mut engine = RefinementEngine::new(
        config.refinement.clone(),
        formalizer,
        embedder,
        proposals,
        oracle,
    );

    match engine.solve(&cli.intent).await? {
        Some(artifact) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            } else {
                println!("-- verified proof --\n{}", artifact.proof_script);
                if !artifact.program_code.is_empty() {
                    println!("\n-- implementation --\n{}", artifact.program_code);
                }
            }
            Ok(())
        }
        None => {
            eprintln!(
                "synthesis failed: step budget of {} exhausted",
                config.refinement.max_refinement_steps
            );
            std::process::exit(1);
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
