//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorStats, ErrorType};
use crate::run::BootstrapReport;

/// Logs the outcome of a bootstrap or refresh run.
pub fn print_report(report: &BootstrapReport) {
    if report.skipped {
        info!("Bootstrap already completed; nothing to do");
        return;
    }
    info!(
        "Run statistics: resolved={}, candidates={}, inserted={}, already_stored={}, enrichment_failures={}, storage_failures={}, elapsed={:.1}s",
        report.resolved,
        report.candidates,
        report.inserted,
        report.already_stored,
        report.enrichment_failures,
        report.storage_failures,
        report.elapsed_seconds
    );
}

/// Prints the non-zero error counters to the log.
pub fn print_error_statistics(error_stats: &ErrorStats) {
    let total_errors = error_stats.total();
    if total_errors == 0 {
        return;
    }

    info!("Error Counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = error_stats.get_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}
