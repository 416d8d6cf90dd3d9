//! Error type definitions.
//!
//! This module defines the error enums for each stage of the pipeline plus the
//! `ErrorType` categories counted by `ErrorStats`.

use std::net::IpAddr;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Failure to resolve one seed hostname.
///
/// Never leaves the resolver: the seed simply contributes no addresses.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The DNS query itself failed (NXDOMAIN, timeout, no upstream).
    #[error("DNS lookup for {host} failed: {source}")]
    Lookup {
        host: String,
        #[source]
        source: ResolveError,
    },

    /// The query succeeded but produced no A/AAAA records.
    #[error("DNS lookup for {host} returned no addresses")]
    NoAddresses { host: String },
}

/// Failure to geolocate one candidate address.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// Transport failure: connect error, timeout, broken body.
    #[error("geolocation request for {ip} failed: {source}")]
    Http {
        ip: IpAddr,
        #[source]
        source: ReqwestError,
    },

    /// The service answered with a non-2xx status.
    #[error("geolocation service returned {status} for {ip}")]
    Status {
        ip: IpAddr,
        status: reqwest::StatusCode,
    },

    /// The body was not the expected JSON document.
    #[error("malformed geolocation response for {ip}: {source}")]
    Decode {
        ip: IpAddr,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered but reported a failed lookup (private range, quota, ...).
    #[error("geolocation service rejected {ip}: {message}")]
    Rejected { ip: IpAddr, message: String },

    /// A successful answer without latitude/longitude.
    #[error("geolocation response for {ip} has no coordinates")]
    MissingCoordinates { ip: IpAddr },
}

impl EnrichmentError {
    /// Whether a later attempt for the same address could succeed.
    ///
    /// Timeouts, connection failures, 429 and 5xx responses are transient.
    /// Decode errors, other 4xx responses and service-side rejections are not.
    pub fn is_transient(&self) -> bool {
        match self {
            EnrichmentError::Http { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            EnrichmentError::Status { status, .. } => {
                status.as_u16() == crate::config::HTTP_STATUS_TOO_MANY_REQUESTS
                    || status.is_server_error()
            }
            EnrichmentError::Decode { .. }
            | EnrichmentError::Rejected { .. }
            | EnrichmentError::MissingCoordinates { .. } => false,
        }
    }
}

/// Errors that stop a bootstrap or refresh run.
///
/// Per-seed and per-candidate failures are never turned into this type.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The node table could not be created.
    #[error("Failed to create node table: {0}")]
    Schema(#[source] DatabaseError),

    /// The node table could not be read.
    #[error("Node store error: {0}")]
    Store(#[from] DatabaseError),
}

/// Categories of failures counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // DNS errors
    DnsLookupError,
    DnsNoAddresses,
    DnsTaskPanicked,
    // Geolocation errors
    GeoRequestTimeoutError,
    GeoRequestConnectError,
    GeoRequestOtherError,
    GeoTooManyRequests,
    GeoServerError,
    GeoClientError,
    GeoDecodeError,
    GeoLookupRejected,
    GeoMissingCoordinates,
    // Storage errors
    StorageInsertError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DnsLookupError => "DNS lookup error",
            ErrorType::DnsNoAddresses => "DNS lookup returned no addresses",
            ErrorType::DnsTaskPanicked => "DNS lookup task panicked",
            ErrorType::GeoRequestTimeoutError => "Geolocation request timeout",
            ErrorType::GeoRequestConnectError => "Geolocation connect error",
            ErrorType::GeoRequestOtherError => "Geolocation request error",
            ErrorType::GeoTooManyRequests => "Geolocation rate limited (429)",
            ErrorType::GeoServerError => "Geolocation server error (5xx)",
            ErrorType::GeoClientError => "Geolocation client error (4xx)",
            ErrorType::GeoDecodeError => "Geolocation decode error",
            ErrorType::GeoLookupRejected => "Geolocation lookup rejected",
            ErrorType::GeoMissingCoordinates => "Geolocation missing coordinates",
            ErrorType::StorageInsertError => "Node insert error",
        }
    }
}
