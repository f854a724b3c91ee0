//! SSP Data Preparation
//! 
//! One-shot staging step. Reads the run selection from the environment,
//! stages the inputs and exits non-zero on the first failure.

use anyhow::{Context, Result};
use tracing::{error, info};

use ssp_dataprep::utils::init_logging;
use ssp_dataprep::{pipeline, RunConfig};

fn run() -> Result<()> {
    let config = RunConfig::from_env().context("Failed to read run configuration")?;
    info!(?config, "Run configuration loaded");

    let report = pipeline::run(&config)
        .with_context(|| format!("Staging failed for {} / {}", config.country, config.scenario))?;

    println!("\n{}", "═".repeat(60));
    println!("📦 Staged 3 files for {}", config.title());
    for staged in [&report.boundary, &report.lads, &report.scenario] {
        println!("   {} ({} bytes, sha256 {})", staged.destination.display(), staged.bytes, &staged.sha256[..12]);
    }
    println!("📝 {}", report.parameters.display());
    println!("🗂️  {}", report.metadata.display());
    println!("{}\n", "═".repeat(60));
    Ok(())
}

fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    init_logging();

    if let Err(e) = run() {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
