//! `dside-inspect`: a debug utility that reads a persisted artifact header
//! and prints its contents, grounded on the teacher's `debug_ir` binary's
//! role as a small standalone inspection tool for otherwise-opaque
//! intermediate artifacts.
//!
//! ## Usage
//!
//! ```bash
//! dside-inspect ./run/explored/header_run_JobScheduling_0.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use dside::persist::DecisionModelHeader;

#[derive(Parser)]
#[command(name = "dside-inspect")]
#[command(about = "Print a decision-model header artifact")]
struct Cli {
    /// Path to a `header_*.json` artifact.
    header_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let bytes = std::fs::read(&cli.header_path)?;
    let header: DecisionModelHeader = serde_json::from_slice(&bytes)?;

    println!("category:         {}", header.category);
    println!("covered elements: {}", header.covered_elements.len());
    for element in &header.covered_elements {
        println!("  - {element}");
    }
    if let Some(body_path) = &header.body_path {
        println!("body path:        {}", body_path.display());
    }
    Ok(())
}
