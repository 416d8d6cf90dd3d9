//! Bootstrap and refresh: resolve, deduplicate, enrich, store.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};

use super::context::DiscoveryContext;
use crate::app::log_progress;
use crate::config::LOGGING_INTERVAL;
use crate::discovery::{deduplicate, resolve_seeds, HostLookup};
use crate::error_handling::{update_error_stats, BootstrapError, ErrorType};
use crate::models::CandidateAddress;
use crate::storage::NodeStore;

/// Outcome of a bootstrap or refresh run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapReport {
    /// A previous bootstrap had completed, nothing was done
    pub skipped: bool,
    /// Addresses returned by all seeds, duplicates included
    pub resolved: usize,
    /// Unique addresses sent to the enricher
    pub candidates: usize,
    /// Nodes written to the store
    pub inserted: usize,
    /// Enriched nodes whose address was already stored
    pub already_stored: usize,
    /// Candidates dropped because geolocation failed
    pub enrichment_failures: usize,
    /// Candidates dropped because the insert failed
    pub storage_failures: usize,
    pub elapsed_seconds: f64,
}

impl BootstrapReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}

impl<R: HostLookup + 'static> DiscoveryContext<R> {
    /// Populates the store unless a previous bootstrap completed.
    ///
    /// An interrupted bootstrap is resumed: addresses already stored are not
    /// looked up again. Per-seed and per-candidate failures are logged and
    /// skipped. Only failing to inspect or create the schema aborts the run.
    pub async fn bootstrap(&self, store: &NodeStore) -> Result<BootstrapReport, BootstrapError> {
        if store.is_bootstrapped().await? {
            info!("Bootstrap already completed, skipping");
            return Ok(BootstrapReport::skipped());
        }

        let start_time = Instant::now();
        store.initialize().await.map_err(BootstrapError::Schema)?;

        let mut report = self.discover_and_store(store).await?;
        store.mark_bootstrapped().await?;
        info!("Bootstrap completed");

        report.elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(report)
    }

    /// Adds nodes the seeds return now but the store doesn't know yet.
    ///
    /// Existing rows are never modified.
    pub async fn refresh(&self, store: &NodeStore) -> Result<BootstrapReport, BootstrapError> {
        let start_time = Instant::now();
        store.initialize().await.map_err(BootstrapError::Schema)?;

        let mut report = self.discover_and_store(store).await?;
        store.mark_bootstrapped().await?;

        report.elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(report)
    }

    /// Resolves and deduplicates, then enriches and stores the addresses the
    /// store doesn't hold yet.
    async fn discover_and_store(
        &self,
        store: &NodeStore,
    ) -> Result<BootstrapReport, BootstrapError> {
        let mut report = BootstrapReport::default();
        let candidates = self.discover(&mut report).await;

        let known = store.known_addresses().await?;
        let fresh: Vec<CandidateAddress> = candidates
            .into_iter()
            .filter(|candidate| !known.contains(&candidate.ip.to_string()))
            .collect();
        if fresh.len() < report.candidates {
            info!(
                "{} of {} candidates are already stored",
                report.candidates - fresh.len(),
                report.candidates
            );
        }
        report.already_stored = report.candidates - fresh.len();

        self.enrich_and_store(store, &fresh, &mut report).await;
        Ok(report)
    }

    async fn discover(&self, report: &mut BootstrapReport) -> Vec<CandidateAddress> {
        info!("Resolving {} DNS seeds", self.seeds.len());
        let addresses = resolve_seeds(
            Arc::clone(&self.resolver),
            &self.seeds,
            Arc::clone(&self.error_stats),
        )
        .await;
        report.resolved = addresses.len();

        let candidates = deduplicate(addresses, self.port);
        report.candidates = candidates.len();
        info!(
            "Number of nodes: {} ({} duplicate addresses collapsed)",
            report.candidates,
            report.resolved - report.candidates
        );
        candidates
    }

    /// Enriches and stores candidates one at a time.
    ///
    /// Each insert completes before the next lookup starts.
    async fn enrich_and_store(
        &self,
        store: &NodeStore,
        candidates: &[CandidateAddress],
        report: &mut BootstrapReport,
    ) {
        if candidates.is_empty() {
            return;
        }
        info!(
            "Geolocating {} candidates (~{:?} between requests)",
            candidates.len(),
            self.enricher.config().pacing
        );

        let start_time = Instant::now();
        for (index, candidate) in candidates.iter().enumerate() {
            let record = match self
                .enricher
                .enrich(candidate)
                .await
                .and_then(|info| info.node_record(candidate))
            {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping {}: {e}", candidate.ip);
                    update_error_stats(&self.error_stats, &e);
                    report.enrichment_failures += 1;
                    continue;
                }
            };

            match store.insert(&record).await {
                Ok(true) => {
                    debug!("Stored {} at ({}, {})", record.ip, record.lat, record.lon);
                    report.inserted += 1;
                }
                Ok(false) => {
                    debug!("{} is already stored", record.ip);
                    report.already_stored += 1;
                }
                Err(e) => {
                    error!("Failed to store {}: {e}", record.ip);
                    self.error_stats.increment(ErrorType::StorageInsertError);
                    report.storage_failures += 1;
                }
            }

            if (index + 1) % LOGGING_INTERVAL == 0 {
                log_progress(start_time, index + 1, candidates.len());
            }
        }
        log_progress(start_time, candidates.len(), candidates.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::StaticHosts;
    use crate::geo::{EnricherConfig, GeoEnricher};
    use crate::storage::test_helpers::create_test_store;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use sqlx::SqlitePool;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn v4(d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, d))
    }

    fn context(server: &Server, hosts: StaticHosts) -> DiscoveryContext<StaticHosts> {
        let enricher = GeoEnricher::new(EnricherConfig {
            base_url: format!("http://{}", server.addr()),
            pacing: Duration::ZERO,
            max_retries: 0,
            ..Default::default()
        })
        .unwrap();
        DiscoveryContext::new(
            Arc::new(hosts),
            enricher,
            vec!["a.seed".to_string(), "b.seed".to_string()],
            8333,
        )
    }

    fn located(ip: IpAddr, lat: f64, lon: f64) -> serde_json::Value {
        serde_json::json!({"status": "success", "lat": lat, "lon": lon, "query": ip.to_string()})
    }

    #[tokio::test]
    async fn test_bootstrap_deduplicates_across_seeds() {
        let server = Server::run();
        for d in [1, 2] {
            server.expect(
                Expectation::matching(request::method_path("GET", format!("/json/{}", v4(d))))
                    .times(1)
                    .respond_with(json_encoded(located(v4(d), 1.0, 2.0))),
            );
        }
        let ctx = context(
            &server,
            StaticHosts::new()
                .with_host("a.seed", vec![v4(1), v4(2)])
                .with_host("b.seed", vec![v4(2)]),
        );
        let store = NodeStore::from_pool(SqlitePool::connect("sqlite::memory:").await.unwrap());

        let report = ctx.bootstrap(&store).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(report.resolved, 3);
        assert_eq!(report.candidates, 2);
        assert_eq!(report.inserted, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_refresh_only_enriches_new_addresses() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", format!("/json/{}", v4(9))))
                .times(1)
                .respond_with(json_encoded(located(v4(9), 5.0, 6.0))),
        );
        let ctx = context(
            &server,
            StaticHosts::new().with_host("a.seed", vec![v4(1), v4(9)]),
        );
        let store = create_test_store().await;
        store
            .insert(&crate::models::NodeRecord {
                ip: v4(1).to_string(),
                port: "8333".to_string(),
                lat: 1.0,
                lon: 2.0,
            })
            .await
            .unwrap();

        let report = ctx.refresh(&store).await.unwrap();

        assert_eq!(report.candidates, 2);
        assert_eq!(report.already_stored, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(ctx.enricher.requests_sent(), 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_coordinates_are_not_stored() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", format!("/json/{}", v4(3))))
                .respond_with(json_encoded(serde_json::json!({"status": "success"}))),
        );
        let ctx = context(&server, StaticHosts::new().with_host("a.seed", vec![v4(3)]));
        let store = NodeStore::from_pool(SqlitePool::connect("sqlite::memory:").await.unwrap());

        let report = ctx.bootstrap(&store).await.unwrap();

        assert_eq!(report.enrichment_failures, 1);
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(
            ctx.error_stats.get_count(ErrorType::GeoMissingCoordinates),
            1
        );
    }

    #[tokio::test]
    async fn test_no_resolvable_seeds_still_completes() {
        let server = Server::run();
        let ctx = context(&server, StaticHosts::new());
        let store = NodeStore::from_pool(SqlitePool::connect("sqlite::memory:").await.unwrap());

        let report = ctx.bootstrap(&store).await.unwrap();

        assert_eq!(report.candidates, 0);
        assert!(store.is_initialized().await.unwrap());
        assert!(store.is_bootstrapped().await.unwrap());
        assert_eq!(ctx.error_stats.get_count(ErrorType::DnsNoAddresses), 2);
    }

    #[tokio::test]
    async fn test_failed_insert_does_not_stop_other_candidates() {
        let server = Server::run();
        for d in [1, 2, 3] {
            server.expect(
                Expectation::matching(request::method_path("GET", format!("/json/{}", v4(d))))
                    .respond_with(json_encoded(located(v4(d), 1.0, 2.0))),
            );
        }
        let ctx = context(
            &server,
            StaticHosts::new().with_host("a.seed", vec![v4(1), v4(2), v4(3)]),
        );
        let store = create_test_store().await;
        sqlx::query(
            "CREATE TRIGGER reject_node BEFORE INSERT ON nodes
            WHEN NEW.ip = '192.0.2.2'
            BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let report = ctx.bootstrap(&store).await.unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.storage_failures, 1);
        assert_eq!(ctx.error_stats.get_count(ErrorType::StorageInsertError), 1);
        let stored = store.known_addresses().await.unwrap();
        assert!(stored.contains("192.0.2.1"));
        assert!(stored.contains("192.0.2.3"));
        assert!(!stored.contains("192.0.2.2"));
    }

    #[tokio::test]
    async fn test_schema_failure_is_fatal() {
        let server = Server::run();
        let ctx = context(&server, StaticHosts::new().with_host("a.seed", vec![v4(1)]));
        let store = NodeStore::from_pool(SqlitePool::connect("sqlite::memory:").await.unwrap());
        // An index named `nodes` makes CREATE TABLE IF NOT EXISTS nodes fail
        sqlx::query("CREATE TABLE other (x INTEGER)")
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query("CREATE INDEX nodes ON other (x)")
            .execute(store.pool())
            .await
            .unwrap();

        let result = ctx.bootstrap(&store).await;

        assert!(matches!(result, Err(BootstrapError::Schema(_))));
        assert_eq!(ctx.resolver.lookups(), 0);
        assert_eq!(ctx.enricher.requests_sent(), 0);
    }

    #[tokio::test]
    async fn test_interrupted_bootstrap_resumes() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", format!("/json/{}", v4(2))))
                .times(1)
                .respond_with(json_encoded(located(v4(2), 3.0, 4.0))),
        );
        let ctx = context(
            &server,
            StaticHosts::new().with_host("a.seed", vec![v4(1), v4(2)]),
        );
        // Schema and one node written, then the process died before completion
        let store = create_test_store().await;
        store
            .insert(&crate::models::NodeRecord {
                ip: v4(1).to_string(),
                port: "8333".to_string(),
                lat: 1.0,
                lon: 2.0,
            })
            .await
            .unwrap();

        let report = ctx.bootstrap(&store).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(report.already_stored, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(ctx.enricher.requests_sent(), 1);
        assert!(store.is_bootstrapped().await.unwrap());
        assert!(ctx.bootstrap(&store).await.unwrap().skipped);
    }
}
