//! Cache Statistics Module
//!
//! Tracks how the coordinator's lookups were served.

use serde::Serialize;

// == Cache Stats ==
/// Counters maintained by the cache coordinator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the store
    pub hits: u64,
    /// Lookups that had to load from the repository
    pub misses: u64,
    /// Successful write-backs of a freshly loaded value
    pub populates: u64,
    /// Loads that failed and left the key absent
    pub populate_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_populate(&mut self) {
        self.populates += 1;
    }

    pub fn record_failure(&mut self) {
        self.populate_failures += 1;
    }
}
