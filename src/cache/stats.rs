//! Cache Statistics Module
//!
//! Tracks read-through metrics: hits, negative hits, misses, storage reads
//! and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered with a cached value
    pub hits: u64,
    /// Lookups answered with a cached "not found"
    pub negative_hits: u64,
    /// Lookups that had to go to storage (missing or expired)
    pub misses: u64,
    /// Reads issued against durable storage
    pub storage_reads: u64,
    /// Storage reads that failed
    pub storage_errors: u64,
    /// Expired holders renewed before a refresh
    pub renewals: u64,
    /// Holders dropped by purges
    pub evictions: u64,
    /// Current number of holders in the pool
    pub total_entries: usize,
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
    /// Negative hits count as hits: they avoided a storage read too.
    /// Returns 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits + self.negative_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_negative_hit(&mut self) {
        self.negative_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_storage_read(&mut self) {
        self.storage_reads += 1;
    }

    pub fn record_storage_error(&mut self) {
        self.storage_errors += 1;
    }

    pub fn record_renewal(&mut self) {
        self.renewals += 1;
    }

    // == Record Evictions ==
    /// Adds `count` purged holders to the eviction counter.
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
