//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including the seed list, timeouts, and the geolocation service endpoint.

use std::time::Duration;

/// Default path of the SQLite node database.
pub const DB_PATH: &str = "./nodes.db";

/// DNS seeds for the Bitcoin peer-to-peer network.
///
/// Each name returns A/AAAA records pointing at currently reachable nodes.
pub const DEFAULT_DNS_SEEDS: &[&str] = &[
    "seed.bitcoin.sipa.be",
    "dnsseed.bluematt.me",
    "dnsseed.bitcoin.dashjr.org",
    "seed.bitcoinstats.com",
    "seed.bitnodes.io",
    "seed.bitcoin.jonasschnelli.ch",
];

/// Port assumed for every discovered node (no port discovery is done).
pub const DEFAULT_NODE_PORT: u16 = 8333;

// Network operation timeouts
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// DNS attempts per query before giving up on a seed
pub const DNS_ATTEMPTS: usize = 2;

// Geolocation service
/// Base URL of the geolocation lookup service (`<base>/json/<ip>`)
pub const GEO_BASE_URL: &str = "http://ip-api.com";
/// Per-request timeout for the geolocation service in seconds
pub const GEO_TIMEOUT_SECS: u64 = 10;
/// Delay before each geolocation request.
/// The free ip-api.com tier allows 45 requests per minute; one per second stays under it.
pub const GEO_PACING: Duration = Duration::from_secs(1);
/// Status value the geolocation service reports for a successful lookup
pub const GEO_STATUS_SUCCESS: &str = "success";

/// User-Agent sent to the geolocation service
pub const DEFAULT_USER_AGENT: &str = concat!("node_globe/", env!("CARGO_PKG_VERSION"));

// Retry strategy
/// Delay before the first retry of a transient geolocation failure
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 8;
/// Retries after the initial attempt (0 disables retrying)
pub const RETRY_MAX_RETRIES: usize = 2;

/// Number of nodes handed to the front end per request
pub const SAMPLE_SIZE: usize = 50;

/// Log a progress line every N enriched candidates
pub const LOGGING_INTERVAL: usize = 25;

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
