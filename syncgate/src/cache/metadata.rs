//! Field-aware metadata cache.
//!
//! Metadata reads for the same resource are commonly requested with
//! varying, overlapping field subsets. Instead of caching whole responses
//! per parameter digest, this cache keeps one growing partial record per
//! resource id and answers any request whose required fields are already
//! known. A field is never served without having actually been fetched.
//!
//! An entry's field set only grows (via merge) or is discarded whole (via
//! [`MetadataCache::invalidate`]); it is never partially truncated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

/// Per-resource-id cache of partially known metadata fields.
#[derive(Debug)]
pub struct MetadataCache {
    /// resource id → known field → value.
    entries: Mutex<HashMap<String, Map<String, Value>>>,

    /// Global enable flag, mirroring [`ResourceCache`](crate::cache::ResourceCache).
    enabled: AtomicBool,
}

impl MetadataCache {
    /// Create a new metadata cache.
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Look up the entry for `id`, requiring every field in
    /// `required_fields` to already be known.
    ///
    /// A stored superset satisfies the request; any unknown required field
    /// is a miss. The full entry is returned on a hit, so callers may see
    /// more fields than they asked for — all of them actually fetched.
    pub fn get(&self, id: &str, required_fields: &[&str]) -> Option<Map<String, Value>> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.lock();
        let entry = entries.get(id)?;
        if required_fields.iter().all(|field| entry.contains_key(*field)) {
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Merge `partial`'s fields into the entry for `id`.
    ///
    /// Fields present in `partial` overwrite; absent fields are left
    /// untouched, so the known-field set only grows. Returns the merged
    /// entry. A pass-through when caching is disabled.
    pub fn set(&self, id: &str, partial: Map<String, Value>) -> Map<String, Value> {
        if !self.is_enabled() {
            return partial;
        }

        let mut entries = self.entries.lock();
        let entry = entries.entry(id.to_string()).or_default();
        for (field, value) in partial {
            entry.insert(field, value);
        }
        entry.clone()
    }

    /// Drop the entry for `id`.
    ///
    /// Used after a failed or "not found" remote read, so a later read is
    /// forced to go live instead of caching a broken state.
    pub fn invalidate(&self, id: &str) {
        if self.entries.lock().remove(id).is_some() {
            debug!(id, "invalidated metadata entry");
        }
    }

    /// Drop every entry.
    pub fn reset(&self) {
        self.entries.lock().clear();
    }

    /// Number of resource ids currently tracked.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Enable or disable caching.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_subset_of_known_fields_is_a_hit() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("id", json!("X")), ("name", json!("report"))]));

        let entry = cache.get("X", &["id"]).expect("subset should hit");
        assert_eq!(entry.get("id"), Some(&json!("X")));
        assert_eq!(entry.get("name"), Some(&json!("report")));
    }

    #[test]
    fn test_unknown_required_field_is_a_miss() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("id", json!("X")), ("name", json!("report"))]));

        assert!(cache.get("X", &["id", "size"]).is_none());
    }

    #[test]
    fn test_unknown_id_is_a_miss() {
        let cache = MetadataCache::new(true);
        assert!(cache.get("X", &["id"]).is_none());
    }

    #[test]
    fn test_merge_grows_the_entry() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("id", json!("X")), ("name", json!("report"))]));
        let merged = cache.set("X", fields(&[("size", json!(1024))]));

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("name"), Some(&json!("report")));
        assert_eq!(merged.get("size"), Some(&json!(1024)));

        // Now the three-field request is served from cache.
        assert!(cache.get("X", &["id", "name", "size"]).is_some());
    }

    #[test]
    fn test_merge_overwrites_only_present_fields() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("name", json!("old")), ("size", json!(1))]));
        let merged = cache.set("X", fields(&[("name", json!("new"))]));

        assert_eq!(merged.get("name"), Some(&json!("new")));
        assert_eq!(merged.get("size"), Some(&json!(1)));
    }

    #[test]
    fn test_invalidate_drops_the_whole_entry() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("id", json!("X"))]));
        cache.set("Y", fields(&[("id", json!("Y"))]));

        cache.invalidate("X");

        assert!(cache.get("X", &["id"]).is_none());
        assert!(cache.get("Y", &["id"]).is_some());
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_reset_drops_everything() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("id", json!("X"))]));
        cache.reset();
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_disabled_cache_misses_and_passes_through() {
        let cache = MetadataCache::new(false);
        let partial = fields(&[("id", json!("X"))]);

        let returned = cache.set("X", partial.clone());
        assert_eq!(returned, partial);
        assert!(cache.get("X", &["id"]).is_none());
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_empty_required_fields_hits_any_known_entry() {
        let cache = MetadataCache::new(true);
        cache.set("X", fields(&[("id", json!("X"))]));
        assert!(cache.get("X", &[]).is_some());
    }
}
