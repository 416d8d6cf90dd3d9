//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use structopt::StructOpt;
use strum::VariantNames;
use strum_macros::{EnumString, VariantNames as VariantNamesMacro};
use thiserror::Error;

use crate::config::constants::{
    DB_PATH, DEFAULT_DNS_SEEDS, DEFAULT_NODE_PORT, DEFAULT_USER_AGENT, GEO_BASE_URL,
    GEO_PACING, GEO_TIMEOUT_SECS, RETRY_MAX_RETRIES,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for `{field}`: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is expected instead
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use node_globe::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("./nodes.db"),
///     pacing_ms: 1500,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// DNS seed hostnames resolved during bootstrap
    pub seeds: Vec<String>,

    /// Port recorded for every discovered node
    pub port: u16,

    /// Base URL of the geolocation service
    pub geo_base_url: String,

    /// Per-request geolocation timeout in seconds
    pub geo_timeout_seconds: u64,

    /// Delay before each geolocation request in milliseconds
    pub pacing_ms: u64,

    /// Retries for transient geolocation failures
    pub max_retries: usize,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Print this many random nodes as JSON after startup
    pub sample: Option<usize>,

    /// Look for new nodes even if the database was already bootstrapped
    pub refresh: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            seeds: DEFAULT_DNS_SEEDS.iter().map(|s| s.to_string()).collect(),
            port: DEFAULT_NODE_PORT,
            geo_base_url: GEO_BASE_URL.to_string(),
            geo_timeout_seconds: GEO_TIMEOUT_SECS,
            pacing_ms: GEO_PACING.as_millis() as u64,
            max_retries: RETRY_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            sample: None,
            refresh: false,
        }
    }
}

impl Config {
    /// Checks the configuration for values that would make a run pointless or unsafe.
    ///
    /// # Errors
    ///
    /// Returns the first offending field together with an actionable message.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.seeds.is_empty() {
            return Err(ConfigValidationError::new(
                "seeds",
                "at least one DNS seed hostname is required",
            ));
        }
        if let Some(seed) = self.seeds.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigValidationError::new(
                "seeds",
                format!("seed hostnames must not be blank (got {seed:?})"),
            ));
        }
        if self.port == 0 {
            return Err(ConfigValidationError::new(
                "port",
                "port must be greater than 0",
            ));
        }
        if self.geo_timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "geo_timeout_seconds",
                "timeout must be greater than 0 seconds",
            ));
        }
        match reqwest::Url::parse(&self.geo_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigValidationError::new(
                    "geo_base_url",
                    format!(
                        "only http:// and https:// are supported (got scheme '{}')",
                        url.scheme()
                    ),
                ))
            }
            Err(e) => {
                return Err(ConfigValidationError::new(
                    "geo_base_url",
                    format!("expected a URL such as {GEO_BASE_URL}: {e}"),
                ))
            }
        }
        if self.sample == Some(0) {
            return Err(ConfigValidationError::new(
                "sample",
                "sample size must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Bootstrap (first run) or open the existing database
/// node_globe
///
/// # Use a different database and print 50 random nodes
/// node_globe --db-path ./mainnet.db --sample 50
///
/// # Look for nodes that appeared since the last run
/// node_globe --refresh
/// ```
#[derive(Debug, StructOpt)]
#[structopt(
    name = "node_globe",
    about = "Discovers peer nodes from DNS seeds and geolocates them."
)]
pub struct Opt {
    /// Database path (SQLite file)
    #[structopt(long, parse(from_os_str), default_value = "./nodes.db")]
    pub db_path: PathBuf,

    /// DNS seed hostname (repeat to use several; defaults to the built-in Bitcoin seeds)
    #[structopt(long = "seed", number_of_values = 1)]
    pub seeds: Vec<String>,

    /// Port recorded for discovered nodes
    #[structopt(long, default_value = "8333")]
    pub port: u16,

    /// Geolocation service base URL
    #[structopt(long, default_value = "http://ip-api.com")]
    pub geo_base_url: String,

    /// Per-request geolocation timeout in seconds
    #[structopt(long, default_value = "10")]
    pub geo_timeout_seconds: u64,

    /// Delay before each geolocation request in milliseconds
    #[structopt(long, default_value = "1000")]
    pub pacing_ms: u64,

    /// Retries for transient geolocation failures (0 disables retrying)
    #[structopt(long, default_value = "2")]
    pub max_retries: usize,

    /// HTTP User-Agent header value
    #[structopt(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[structopt(long, default_value = "info", possible_values = LogLevel::VARIANTS, case_insensitive = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[structopt(long, default_value = "plain", possible_values = LogFormat::VARIANTS, case_insensitive = true)]
    pub log_format: LogFormat,

    /// Print this many random nodes as JSON once the database is ready
    #[structopt(long)]
    pub sample: Option<usize>,

    /// Resolve the seeds again and add nodes that are not stored yet
    #[structopt(long)]
    pub refresh: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        let seeds = if opt.seeds.is_empty() {
            DEFAULT_DNS_SEEDS.iter().map(|s| s.to_string()).collect()
        } else {
            opt.seeds
        };
        Self {
            db_path: opt.db_path,
            seeds,
            port: opt.port,
            geo_base_url: opt.geo_base_url,
            geo_timeout_seconds: opt.geo_timeout_seconds,
            pacing_ms: opt.pacing_ms,
            max_retries: opt.max_retries,
            user_agent: opt.user_agent,
            log_level: opt.log_level,
            log_format: opt.log_format,
            sample: opt.sample,
            refresh: opt.refresh,
        }
    }
}
