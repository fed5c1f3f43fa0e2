//! Field-aware metadata calls.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::bridge::{BridgeDispatcher, BridgeError};
use crate::cache::MetadataCache;

/// Thin wrapper tying the [`MetadataCache`] to the bridge.
///
/// A read asking only for fields already known for the id is served from
/// cache with no remote dispatch. A miss goes live with `{id, fields}`
/// and the returned partial record is merged into the cache, so the known
/// field set keeps growing. A failed live read invalidates the id rather
/// than caching a broken state.
#[derive(Clone)]
pub struct MetadataClient {
    dispatcher: Arc<BridgeDispatcher>,
    cache: Arc<MetadataCache>,
}

impl MetadataClient {
    /// Create a client over the given dispatcher and cache.
    pub fn new(dispatcher: Arc<BridgeDispatcher>, cache: Arc<MetadataCache>) -> Self {
        Self { dispatcher, cache }
    }

    /// Read metadata fields for `id` via `operation`.
    ///
    /// Returns the full known entry on a cache hit (a superset of
    /// `fields`). On a miss the live result must be an object; its fields
    /// are merged into the cache and the merged entry is returned.
    ///
    /// # Errors
    ///
    /// Propagates [`BridgeError`] from the live call, invalidating the
    /// cached entry for `id` first. A non-object live result is a
    /// [`BridgeError::Serialization`].
    pub fn fetch(
        &self,
        operation: &str,
        id: &str,
        fields: &[&str],
    ) -> Result<Map<String, Value>, BridgeError> {
        if let Some(entry) = self.cache.get(id, fields) {
            debug!(operation, id, "metadata served from cache");
            return Ok(entry);
        }

        let payload = json!({"id": id, "fields": fields});
        match self.dispatcher.invoke_value(operation, payload) {
            Ok(Value::Object(partial)) => Ok(self.cache.set(id, partial)),
            Ok(other) => Err(BridgeError::Serialization {
                reason: format!(
                    "metadata operation '{operation}' returned a non-object value: {other}"
                ),
            }),
            Err(error) => {
                // A read that failed must not leave a cached absent or
                // broken state behind; force the next read to go live.
                self.cache.invalidate(id);
                Err(error)
            }
        }
    }

    /// Merge fields for `id` into the cache without a remote call.
    ///
    /// Used when another operation's response already carried metadata
    /// fields worth keeping.
    pub fn store(&self, id: &str, partial: Map<String, Value>) -> Map<String, Value> {
        self.cache.set(id, partial)
    }

    /// Drop the cached entry for `id`.
    pub fn invalidate(&self, id: &str) {
        self.cache.invalidate(id);
    }

    /// The underlying cache, for observability and explicit lifecycle.
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }
}
