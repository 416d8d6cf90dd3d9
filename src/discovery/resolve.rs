//! Concurrent resolution of seed hostnames.

use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, warn};
use tokio::sync::mpsc;
use trust_dns_resolver::TokioAsyncResolver;

use crate::error_handling::{
    categorize_resolution_error, ErrorStats, ErrorType, ResolutionError,
};

/// Forward lookup of a hostname to its A/AAAA addresses.
pub trait HostLookup: Send + Sync {
    fn lookup_host(
        &self,
        host: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, ResolutionError>> + Send;
}

impl HostLookup for TokioAsyncResolver {
    async fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, ResolutionError> {
        let response = self
            .lookup_ip(host)
            .await
            .map_err(|source| ResolutionError::Lookup {
                host: host.to_string(),
                source,
            })?;
        let addresses: Vec<IpAddr> = response.iter().collect();
        if addresses.is_empty() {
            return Err(ResolutionError::NoAddresses {
                host: host.to_string(),
            });
        }
        Ok(addresses)
    }
}

/// Fixed hostname table, answered without touching the network.
///
/// Unknown names fail the same way an NXDOMAIN would. Every call is counted.
#[derive(Debug, Default)]
pub struct StaticHosts {
    hosts: HashMap<String, Vec<IpAddr>>,
    lookups: AtomicUsize,
}

impl StaticHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &str, addresses: Vec<IpAddr>) -> Self {
        self.hosts.insert(host.to_string(), addresses);
        self
    }

    /// Number of lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl HostLookup for StaticHosts {
    async fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, ResolutionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.hosts.get(host) {
            Some(addresses) if !addresses.is_empty() => Ok(addresses.clone()),
            _ => Err(ResolutionError::NoAddresses {
                host: host.to_string(),
            }),
        }
    }
}

/// Resolves every seed concurrently and returns all addresses found.
///
/// One task is spawned per seed. A seed that fails to resolve is logged,
/// counted in `error_stats` and contributes nothing. The function returns only
/// after every task has finished: results flow through a channel that closes
/// when the last task drops its sender, and each task handle is joined.
///
/// The result is unordered and may contain duplicates.
pub async fn resolve_seeds<R>(
    resolver: Arc<R>,
    seeds: &[String],
    error_stats: Arc<ErrorStats>,
) -> Vec<IpAddr>
where
    R: HostLookup + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Vec<IpAddr>>(seeds.len().max(1));
    let mut tasks = FuturesUnordered::new();

    for seed in seeds {
        let tx = tx.clone();
        let resolver = Arc::clone(&resolver);
        let error_stats = Arc::clone(&error_stats);
        let seed = seed.clone();

        tasks.push(tokio::spawn(async move {
            match resolver.lookup_host(&seed).await {
                Ok(addresses) => {
                    debug!("Seed {} resolved to {} addresses", seed, addresses.len());
                    // Capacity covers one message per seed, so this never waits
                    let _ = tx.send(addresses).await;
                }
                Err(e) => {
                    warn!("Skipping seed: {e}");
                    error_stats.increment(categorize_resolution_error(&e));
                }
            }
        }));
    }
    drop(tx);

    let mut addresses = Vec::new();
    while let Some(batch) = rx.recv().await {
        addresses.extend(batch);
    }

    while let Some(joined) = tasks.next().await {
        if let Err(e) = joined {
            warn!("DNS lookup task failed: {e}");
            error_stats.increment(ErrorType::DnsTaskPanicked);
        }
    }

    addresses
}
