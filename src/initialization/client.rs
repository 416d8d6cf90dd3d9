//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::geo::EnricherConfig;

/// Initializes the HTTP client used for geolocation lookups.
///
/// The client carries the per-request timeout and User-Agent from `config`.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &EnricherConfig) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
}
