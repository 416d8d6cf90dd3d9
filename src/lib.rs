//! node_globe library: peer node discovery and geolocation
//!
//! Resolves a set of DNS seed hostnames into peer addresses, geolocates each
//! address through an ip-api.com compatible service and keeps the results in
//! a SQLite table that a map front end can sample from.
//!
//! # Example
//!
//! ```no_run
//! use node_globe::{run, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     db_path: std::path::PathBuf::from("./nodes.db"),
//!     sample: Some(50),
//!     ..Default::default()
//! };
//!
//! let outcome = run(config).await?;
//! println!("{} nodes stored", outcome.total_nodes);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

mod app;
pub mod config;
pub mod discovery;
pub mod error_handling;
pub mod geo;
pub mod initialization;
pub mod models;
mod run;
pub mod storage;

// Re-export public API
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel, Opt, SAMPLE_SIZE};
pub use models::{nodes_payload, CandidateAddress, NodeRecord, NodesPayload};
pub use run::{run, BootstrapReport, DiscoveryContext, RunReport};
pub use storage::NodeStore;
