//! Error handling and run statistics.
//!
//! This module provides:
//! - Error type definitions for each pipeline stage
//! - Error statistics tracking (counts per `ErrorType`)
//! - Retry strategy configuration and error categorization

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_enrichment_error, categorize_resolution_error, get_retry_strategy,
    update_error_stats,
};
pub use stats::ErrorStats;
pub use types::{
    BootstrapError, DatabaseError, EnrichmentError, ErrorType, InitializationError,
    ResolutionError,
};
