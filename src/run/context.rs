//! Shared resources for a discovery run.

use std::sync::Arc;

use crate::discovery::HostLookup;
use crate::error_handling::ErrorStats;
use crate::geo::GeoEnricher;

/// Everything the pipeline needs besides the store.
///
/// Generic over the DNS backend so runs can be driven by `StaticHosts`.
pub struct DiscoveryContext<R> {
    /// DNS resolver for the seed hostnames
    pub resolver: Arc<R>,
    /// Geolocation client
    pub enricher: GeoEnricher,
    /// Seed hostnames to expand
    pub seeds: Vec<String>,
    /// Port recorded for every node
    pub port: u16,
    /// Error statistics tracker
    pub error_stats: Arc<ErrorStats>,
}

impl<R: HostLookup + 'static> DiscoveryContext<R> {
    pub fn new(resolver: Arc<R>, enricher: GeoEnricher, seeds: Vec<String>, port: u16) -> Self {
        Self {
            resolver,
            enricher,
            seeds,
            port,
            error_stats: Arc::new(ErrorStats::new()),
        }
    }
}
