//! `dside` CLI: the orchestrator entry point.
//!
//! ## Usage
//!
//! ```bash
//! dside --run-path ./run --x-max-solutions 4 -v INFO design.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use dside::orchestrator::{Orchestrator, RunSummary};
use dside::Config;
use dside_graph::GraphBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dside")]
#[command(about = "Design Space Identification and Exploration orchestrator")]
#[command(version)]
struct Cli {
    /// Base directory for intermediate and output artifacts.
    #[arg(long, default_value = "./run")]
    run_path: PathBuf,

    /// Maximum number of solutions to explore (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    x_max_solutions: u32,

    /// Wall-clock exploration timeout in seconds (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    x_improvement_time_out: u32,

    /// Worker pool size for the rule engine (0 = logical CPU count).
    #[arg(short = 'p', long, default_value_t = 0)]
    parallelism: usize,

    /// Log level.
    #[arg(short = 'v', long, default_value = "INFO")]
    verbosity: String,

    /// One or more design-model file paths, concatenated into a single
    /// graph. File parsing is out of scope for this orchestrator; paths
    /// are accepted here for interface completeness but nothing reads
    /// them yet — a design-model loader is expected to sit upstream of
    /// this binary.
    design_models: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.verbosity))
        .init();

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load configuration; using defaults");
        Config::default()
    });
    config.run.run_path = cli.run_path;
    config.run.x_max_solutions = cli.x_max_solutions;
    config.run.x_improvement_timeout_sec = cli.x_improvement_time_out;
    if cli.parallelism > 0 {
        config.run.parallelism = cli.parallelism;
    }

    if cli.design_models.is_empty() {
        tracing::warn!("no design-model paths given; running against an empty graph");
    }

    let graph = GraphBuilder::new().build()?;
    let orchestrator = Orchestrator::new(config);

    match orchestrator.run(graph) {
        RunSummary::Success { n_solutions } => {
            tracing::info!(n_solutions, "run complete");
            Ok(())
        }
        RunSummary::NoExplorerFound => {
            tracing::warn!("no explorer matched any identified decision model");
            std::process::exit(1);
        }
        RunSummary::Fatal(err) => {
            tracing::error!(error = %err, "fatal error");
            Err(err.into())
        }
    }
}
