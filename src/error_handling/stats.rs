//! Error statistics tracking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Thread-safe error statistics tracker.
///
/// Tracks the count of each `ErrorType` using atomic counters. The resolver
/// tasks report into it concurrently, so it is shared through `Arc`.
pub struct ErrorStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ErrorStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ErrorStats { errors }
    }

    pub fn increment(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map",
                error
            );
        }
    }

    pub fn get_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|counter| counter.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.errors
            .values()
            .map(|counter| counter.load(Ordering::SeqCst))
            .sum()
    }
}

impl Default for ErrorStats {
    fn default() -> Self {
        Self::new()
    }
}
