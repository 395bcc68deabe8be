//! Scenario runner for the matchmaker application.
//!
//! Spins up two simulated participants over one application artifact,
//! registers the scripted scenarios, executes them under the TAP
//! executor, and exits with its verdict.
//!
//! Usage:
//!   matchmaker-scenario
//!   matchmaker-scenario --verbose
//!   matchmaker-scenario --dna path/to/other.dna.json

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use matchmaker_harness::{
    install_fault_observer, Dna, Harness, HarnessConfig, LegacyResultAdapter, TapExecutor,
};
use matchmaker_scenarios::{register_scenarios, MatchmakerStub};

const DNA_NAME: &str = "matchmaker-tats";
const DNA_FILE: &str = "dist/matchmaker-tats.dna.json";

/// Matchmaker scenario runner
#[derive(Parser, Debug)]
#[command(name = "matchmaker-scenario")]
#[command(about = "Run integration scenarios against the matchmaker application")]
struct Args {
    /// Application artifact path (default: the bundled dist artifact)
    #[arg(long)]
    dna: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Faults outside the scenario control flow are logged, not fatal
    install_fault_observer();

    // The artifact resolves relative to this crate unless overridden
    let dna = match &args.dna {
        Some(path) => {
            let cwd = std::env::current_dir()?;
            Dna::from_file(&cwd, path, DNA_NAME).context("Failed to resolve artifact override")?
        }
        None => Dna::from_file(Path::new(env!("CARGO_MANIFEST_DIR")), DNA_FILE, DNA_NAME)
            .context("Failed to resolve bundled artifact")?,
    };
    tracing::info!(dna = %dna.name(), path = %dna.path().display(), "Loaded application artifact");

    let config = HarnessConfig::builder(dna, Arc::new(MatchmakerStub))
        .instance("alice")
        .instance("bob")
        .debug_log(false)
        .middleware(Arc::new(LegacyResultAdapter))
        .build()
        .context("Failed to build topology")?;

    let mut harness = Harness::new(config, Box::new(TapExecutor::new()));
    register_scenarios(&mut harness).context("Failed to register scenarios")?;

    let summary = harness.run().await;
    tracing::info!(
        scenarios = summary.scenarios,
        failed = summary.scenarios_failed,
        "Run finished"
    );

    std::process::exit(summary.exit_code());
}
