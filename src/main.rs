//! Main application entry point (CLI binary).
//!
//! Thin wrapper around the `node_globe` library that handles argument
//! parsing, logger setup and user-facing output.

use std::process;

use anyhow::{Context, Result};
use structopt::StructOpt;

use node_globe::initialization::init_logger_with;
use node_globe::{run, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Opt::from_args());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(config).await {
        Ok(outcome) => {
            if outcome.report.skipped {
                println!(
                    "Bootstrap already completed: {} node{} in {}",
                    outcome.total_nodes,
                    if outcome.total_nodes == 1 { "" } else { "s" },
                    outcome.db_path.display()
                );
            } else {
                println!(
                    "Stored {} new node{} ({} candidates, {} failed) in {:.1}s",
                    outcome.report.inserted,
                    if outcome.report.inserted == 1 { "" } else { "s" },
                    outcome.report.candidates,
                    outcome.report.enrichment_failures + outcome.report.storage_failures,
                    outcome.report.elapsed_seconds
                );
                println!("Results saved in {}", outcome.db_path.display());
            }

            if let Some(sample) = outcome.sample {
                let json =
                    serde_json::to_string_pretty(&sample).context("Failed to encode sample")?;
                println!("{json}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("node_globe error: {:#}", e);
            process::exit(1);
        }
    }
}
