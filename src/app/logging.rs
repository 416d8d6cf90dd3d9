//! Progress logging utilities.

use log::info;

/// Logs how far the enrichment loop has got.
///
/// # Arguments
///
/// * `start_time` - When enrichment started
/// * `done` - Candidates processed so far (successful or not)
/// * `total` - Candidates in this run
pub fn log_progress(start_time: std::time::Instant, done: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        done as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Enriched {}/{} candidates in {:.1} seconds (~{:.2} per second)",
        done, total, elapsed_secs, rate
    );
}
