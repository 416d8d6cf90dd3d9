//! Rate-limited lookups against the geolocation service.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::{debug, warn};
use tokio_retry::RetryIf;

use super::types::GeoInfo;
use crate::config::{
    Config, DEFAULT_USER_AGENT, GEO_BASE_URL, GEO_PACING, GEO_TIMEOUT_SECS,
    RETRY_INITIAL_DELAY_MS, RETRY_MAX_RETRIES,
};
use crate::error_handling::{get_retry_strategy, EnrichmentError, InitializationError};
use crate::initialization::init_client;
use crate::models::CandidateAddress;

/// Settings for `GeoEnricher`.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Service root; requests go to `<base_url>/json/<ip>`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay before every request, retries included
    pub pacing: Duration,
    /// Retries for transient failures
    pub max_retries: usize,
    /// Delay before the first retry; later retries double it
    pub retry_initial_delay: Duration,
    pub user_agent: String,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            base_url: GEO_BASE_URL.to_string(),
            timeout: Duration::from_secs(GEO_TIMEOUT_SECS),
            pacing: GEO_PACING,
            max_retries: RETRY_MAX_RETRIES,
            retry_initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&Config> for EnricherConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.geo_base_url.clone(),
            timeout: Duration::from_secs(config.geo_timeout_seconds),
            pacing: Duration::from_millis(config.pacing_ms),
            max_retries: config.max_retries,
            retry_initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Client for the geolocation service.
///
/// Requests are strictly sequential: callers await each lookup before starting
/// the next, and every request first sleeps for the configured pacing delay.
pub struct GeoEnricher {
    client: reqwest::Client,
    config: EnricherConfig,
    requests: AtomicUsize,
}

impl GeoEnricher {
    /// Creates an enricher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(config: EnricherConfig) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        Ok(Self {
            client,
            config,
            requests: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// Number of HTTP requests sent so far (retries included).
    pub fn requests_sent(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        format!("{}/json/{}", self.config.base_url.trim_end_matches('/'), ip)
    }

    /// Performs exactly one paced request for `ip`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and timeouts, non-2xx responses, bodies that
    /// are not a `GeoInfo` document, and answers without usable coordinates.
    pub async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo, EnrichmentError> {
        tokio::time::sleep(self.config.pacing).await;
        self.requests.fetch_add(1, Ordering::SeqCst);

        let url = self.lookup_url(ip);
        debug!("Geolocating {ip} via {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| EnrichmentError::Http { ip, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status { ip, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| EnrichmentError::Http { ip, source })?;
        let info: GeoInfo = serde_json::from_slice(&body)
            .map_err(|source| EnrichmentError::Decode { ip, source })?;

        info.validate(ip)?;
        Ok(info)
    }

    /// Geolocates `candidate`, retrying transient failures with exponential backoff.
    pub async fn enrich(&self, candidate: &CandidateAddress) -> Result<GeoInfo, EnrichmentError> {
        let strategy =
            get_retry_strategy(self.config.retry_initial_delay, self.config.max_retries);
        let ip = candidate.ip;
        let max_retries = self.config.max_retries;
        let mut failed_attempts = 0;

        RetryIf::start(
            strategy,
            || self.lookup(ip),
            |e: &EnrichmentError| {
                failed_attempts += 1;
                let retry = will_retry(e, failed_attempts, max_retries);
                if retry {
                    warn!("Geolocation attempt {failed_attempts} failed, retrying: {e}");
                }
                retry
            },
        )
        .await
    }
}

/// Whether a failure is followed by another attempt.
fn will_retry(error: &EnrichmentError, failed_attempts: usize, max_retries: usize) -> bool {
    error.is_transient() && failed_attempts <= max_retries
}
