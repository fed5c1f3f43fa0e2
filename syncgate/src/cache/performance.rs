//! Cache performance counters.

use std::fmt;

use serde::Serialize;

/// Point-in-time snapshot of cache performance counters.
///
/// Counters accumulate for the process lifetime and are never reset
/// automatically; they are intended for test assertions and operational
/// monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachePerformance {
    /// Number of lookups answered from the cache.
    pub hits: u64,

    /// Number of lookups that fell through to a live call.
    pub misses: u64,

    /// Number of distinct resource ids currently tracked.
    pub number_of_caches: usize,

    /// Whether caching is globally enabled.
    pub caching_enabled: bool,
}

impl CachePerformance {
    /// Fraction of lookups answered from the cache, in `0.0..=1.0`.
    ///
    /// Returns `0.0` before any lookup has happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CachePerformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits: {}, misses: {}, caches: {}, enabled: {}",
            self.hits, self.misses, self.number_of_caches, self.caching_enabled
        )
    }
}
