//! Per-resource response cache for remote call results.
//!
//! The store maps a resource id to a sub-map of `digest(params) → value`,
//! so the same resource queried with different parameter shapes occupies
//! separate slots while key-order permutations of the same parameters
//! share one. Mutations invalidate the whole sub-map for the addressed
//! resource id: correctness (never serve stale data after a mutation) is
//! prioritized over hit rate.
//!
//! Lookups never fail. A cache that cannot answer behaves as a miss and
//! the caller falls through to a live call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::cache::digest::digest;
use crate::cache::performance::CachePerformance;

/// Response cache keyed by resource id and parameter digest.
///
/// Owned by the calling side; the worker context never touches it. Access
/// is serialized by the calling contract, but the store uses interior
/// mutability (lock + atomics) so it can be shared behind an `Arc` with
/// `&self` methods.
#[derive(Debug)]
pub struct ResourceCache {
    /// resource id → (parameter digest → cached value).
    entries: Mutex<HashMap<String, HashMap<String, Value>>>,

    /// Lookups answered from the cache.
    hits: AtomicU64,

    /// Lookups that fell through.
    misses: AtomicU64,

    /// Global enable flag. Disabled means every get misses and every set
    /// is a no-op.
    enabled: AtomicBool,
}

impl ResourceCache {
    /// Create a new cache.
    ///
    /// # Arguments
    ///
    /// * `enabled` - Initial state of the global caching flag
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Look up a cached value for `resource_id` under `digest(params)`.
    ///
    /// Increments the hit or miss counter. Returns `None` whenever caching
    /// is disabled, regardless of contents.
    pub fn get(&self, resource_id: &str, params: &Value) -> Option<Value> {
        if !self.is_enabled() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let key = digest(params);
        let entries = self.entries.lock();
        match entries.get(resource_id).and_then(|slots| slots.get(&key)) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value for `resource_id` under `digest(params)`.
    ///
    /// Returns the value either way so callers can store-and-return in one
    /// expression. A no-op when caching is disabled.
    pub fn set(&self, resource_id: &str, params: &Value, value: Value) -> Value {
        if !self.is_enabled() {
            return value;
        }

        let key = digest(params);
        self.entries
            .lock()
            .entry(resource_id.to_string())
            .or_default()
            .insert(key, value.clone());
        value
    }

    /// Drop every cached value for `resource_id`.
    ///
    /// Called by mutation paths before the mutation is dispatched, so a
    /// previously cached read can never be served across a mutation.
    pub fn clear(&self, resource_id: &str) {
        if self.entries.lock().remove(resource_id).is_some() {
            debug!(resource_id, "cleared cached responses for resource");
        }
    }

    /// Drop every cached value for every resource id.
    ///
    /// Counters are retained; only the stored values are discarded.
    pub fn reset(&self) {
        self.entries.lock().clear();
    }

    /// Snapshot the performance counters.
    pub fn performance(&self) -> CachePerformance {
        CachePerformance {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            number_of_caches: self.entries.lock().len(),
            caching_enabled: self.is_enabled(),
        }
    }

    /// Enable or disable caching globally.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether caching is globally enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_miss_then_hit() {
        let cache = ResourceCache::new(true);
        let params = json!({"id": "X", "fields": ["name"]});

        assert_eq!(cache.get("X", &params), None);
        cache.set("X", &params, json!({"name": "report.txt"}));
        assert_eq!(cache.get("X", &params), Some(json!({"name": "report.txt"})));

        let perf = cache.performance();
        assert_eq!(perf.hits, 1);
        assert_eq!(perf.misses, 1);
        assert_eq!(perf.number_of_caches, 1);
    }

    #[test]
    fn test_hit_is_key_order_independent() {
        let cache = ResourceCache::new(true);
        cache.set("X", &json!({"a": 1, "b": 2}), json!("cached"));

        assert_eq!(cache.get("X", &json!({"b": 2, "a": 1})), Some(json!("cached")));
    }

    #[test]
    fn test_resource_ids_are_isolated() {
        let cache = ResourceCache::new(true);
        let params = json!({"fields": ["id"]});

        cache.set("X", &params, json!("for X"));
        assert_eq!(cache.get("Y", &params), None);
        assert_eq!(cache.get("X", &params), Some(json!("for X")));
    }

    #[test]
    fn test_clear_removes_only_that_resource() {
        let cache = ResourceCache::new(true);
        let params = json!({"fields": ["id"]});

        cache.set("X", &params, json!("for X"));
        cache.set("Y", &params, json!("for Y"));
        cache.clear("X");

        assert_eq!(cache.get("X", &params), None);
        assert_eq!(cache.get("Y", &params), Some(json!("for Y")));
        assert_eq!(cache.performance().number_of_caches, 1);
    }

    #[test]
    fn test_reset_drops_everything_but_keeps_counters() {
        let cache = ResourceCache::new(true);
        let params = json!({});

        cache.set("X", &params, json!(1));
        cache.get("X", &params);
        cache.reset();

        assert_eq!(cache.get("X", &params), None);
        let perf = cache.performance();
        assert_eq!(perf.hits, 1);
        assert_eq!(perf.misses, 1);
        assert_eq!(perf.number_of_caches, 0);
    }

    #[test]
    fn test_set_returns_the_value() {
        let cache = ResourceCache::new(true);
        let stored = cache.set("X", &json!({}), json!({"n": 1}));
        assert_eq!(stored, json!({"n": 1}));
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let cache = ResourceCache::new(false);
        let params = json!({"id": "X"});

        cache.set("X", &params, json!("never served"));
        assert_eq!(cache.get("X", &params), None);

        let perf = cache.performance();
        assert_eq!(perf.hits, 0);
        assert_eq!(perf.misses, 1);
        assert_eq!(perf.number_of_caches, 0);
        assert!(!perf.caching_enabled);
    }

    #[test]
    fn test_disabling_hides_existing_entries() {
        let cache = ResourceCache::new(true);
        let params = json!({"id": "X"});
        cache.set("X", &params, json!("cached"));

        cache.set_enabled(false);
        assert_eq!(cache.get("X", &params), None);

        // Re-enabling exposes the entry again; nothing was discarded.
        cache.set_enabled(true);
        assert_eq!(cache.get("X", &params), Some(json!("cached")));
    }

    #[test]
    fn test_replace_existing_slot() {
        let cache = ResourceCache::new(true);
        let params = json!({"id": "X"});

        cache.set("X", &params, json!("old"));
        cache.set("X", &params, json!("new"));
        assert_eq!(cache.get("X", &params), Some(json!("new")));
    }
}
