//! Top-level run orchestration.
//!
//! `run` wires configuration, storage, DNS and geolocation together, then
//! bootstraps (or refreshes) the node store and optionally samples it.

mod context;
mod pipeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::app::{print_error_statistics, print_report};
use crate::config::Config;
use crate::geo::{EnricherConfig, GeoEnricher};
use crate::initialization::init_resolver;
use crate::models::{nodes_payload, NodesPayload};
use crate::storage::NodeStore;

pub use context::DiscoveryContext;
pub use pipeline::BootstrapReport;

/// Results of a run, for callers that drive the library directly.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// What bootstrap or refresh did
    pub report: BootstrapReport,
    /// Nodes in the store once the run finished
    pub total_nodes: i64,
    pub db_path: PathBuf,
    /// Random nodes, when `Config::sample` was set
    pub sample: Option<NodesPayload>,
}

/// Runs discovery with the given configuration.
///
/// This function does not initialize logging; callers own the logger.
///
/// # Errors
///
/// Fails on invalid configuration, when the database cannot be opened, when
/// the HTTP client cannot be built, or when the node table cannot be created.
/// Failures of individual seeds or nodes are logged and counted instead.
pub async fn run(config: Config) -> Result<RunReport> {
    config.validate().context("Invalid configuration")?;

    let store = NodeStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    let enricher = GeoEnricher::new(EnricherConfig::from(&config))
        .context("Failed to initialize geolocation client")?;
    let ctx = DiscoveryContext::new(
        init_resolver(),
        enricher,
        config.seeds.clone(),
        config.port,
    );

    let report = if config.refresh {
        info!("Refreshing node store from {} seeds", ctx.seeds.len());
        ctx.refresh(&store).await
    } else {
        ctx.bootstrap(&store).await
    }
    .context("Node discovery failed")?;

    print_report(&report);
    print_error_statistics(&ctx.error_stats);

    let total_nodes = store
        .count()
        .await
        .context("Failed to count stored nodes")?;
    info!("{} nodes stored in {}", total_nodes, config.db_path.display());

    let sample = match config.sample {
        Some(n) => {
            let nodes = store
                .sample_random(n)
                .await
                .context("Failed to sample nodes")?;
            Some(nodes_payload(nodes))
        }
        None => None,
    };

    store.close().await;

    Ok(RunReport {
        report,
        total_nodes,
        db_path: config.db_path,
        sample,
    })
}
