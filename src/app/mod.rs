//! Reporting helpers used by the run loop.

mod logging;
pub mod statistics;

pub use logging::log_progress;
pub use statistics::{print_error_statistics, print_report};
