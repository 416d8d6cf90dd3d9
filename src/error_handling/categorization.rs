//! Error categorization and retry strategy.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::stats::ErrorStats;
use super::types::{EnrichmentError, ErrorType, ResolutionError};

/// Creates an exponential backoff retry strategy.
///
/// The first delay is `initial_delay` and every following delay doubles, capped
/// at `RETRY_MAX_DELAY_SECS`. The iterator yields `max_retries` delays, so the
/// operation runs at most `max_retries + 1` times.
pub fn get_retry_strategy(
    initial_delay: Duration,
    max_retries: usize,
) -> impl Iterator<Item = Duration> {
    // tokio-retry multiplies `factor` by base^n, so base 2 doubles and factor sets the first step
    let factor = (initial_delay.as_millis() as u64 / 2).max(1);
    ExponentialBackoff::from_millis(2)
        .factor(factor)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(max_retries)
}

/// Categorizes an `EnrichmentError` into an `ErrorType`.
pub fn categorize_enrichment_error(error: &EnrichmentError) -> ErrorType {
    match error {
        EnrichmentError::Http { source, .. } => {
            if source.is_timeout() {
                ErrorType::GeoRequestTimeoutError
            } else if source.is_connect() {
                ErrorType::GeoRequestConnectError
            } else {
                ErrorType::GeoRequestOtherError
            }
        }
        EnrichmentError::Status { status, .. } => {
            if status.as_u16() == crate::config::HTTP_STATUS_TOO_MANY_REQUESTS {
                ErrorType::GeoTooManyRequests
            } else if status.is_server_error() {
                ErrorType::GeoServerError
            } else {
                ErrorType::GeoClientError
            }
        }
        EnrichmentError::Decode { .. } => ErrorType::GeoDecodeError,
        EnrichmentError::Rejected { .. } => ErrorType::GeoLookupRejected,
        EnrichmentError::MissingCoordinates { .. } => ErrorType::GeoMissingCoordinates,
    }
}

/// Categorizes a `ResolutionError` into an `ErrorType`.
pub fn categorize_resolution_error(error: &ResolutionError) -> ErrorType {
    match error {
        ResolutionError::Lookup { .. } => ErrorType::DnsLookupError,
        ResolutionError::NoAddresses { .. } => ErrorType::DnsNoAddresses,
    }
}

/// Records an enrichment failure in the error statistics.
pub fn update_error_stats(error_stats: &ErrorStats, error: &EnrichmentError) {
    error_stats.increment(categorize_enrichment_error(error));
}
