// Shared test helpers for on-disk stores and a fake geolocation service.

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};

use node_globe::discovery::StaticHosts;
use node_globe::geo::{EnricherConfig, GeoEnricher};
use node_globe::{DiscoveryContext, NodeStore};

/// Opens (creating if needed) a node store at `db_path`.
#[allow(dead_code)] // Used by other test files
pub async fn open_store(db_path: &Path) -> NodeStore {
    NodeStore::open(db_path)
        .await
        .expect("Failed to open test database")
}

/// A context whose DNS answers come from `hosts` and whose geolocation
/// requests go to `server`, without pacing or retries.
#[allow(dead_code)]
pub fn test_context(
    server: &Server,
    hosts: StaticHosts,
    seeds: &[&str],
) -> DiscoveryContext<StaticHosts> {
    let enricher = GeoEnricher::new(EnricherConfig {
        base_url: format!("http://{}", server.addr()),
        timeout: Duration::from_secs(2),
        pacing: Duration::ZERO,
        max_retries: 0,
        ..Default::default()
    })
    .expect("Failed to build enricher");
    DiscoveryContext::new(
        Arc::new(hosts),
        enricher,
        seeds.iter().map(|s| s.to_string()).collect(),
        8333,
    )
}

/// Makes `server` answer every lookup of `ip` with the given coordinates.
#[allow(dead_code)]
pub fn expect_located(server: &Server, ip: IpAddr, lat: f64, lon: f64) {
    server.expect(
        Expectation::matching(request::method_path("GET", format!("/json/{ip}")))
            .times(..)
            .respond_with(json_encoded(serde_json::json!({
                "status": "success",
                "country": "Testland",
                "lat": lat,
                "lon": lon,
                "query": ip.to_string()
            }))),
    );
}
