//! Cache-aware resource calls.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::bridge::{BridgeDispatcher, BridgeError};
use crate::cache::ResourceCache;

/// Thin wrapper tying the [`ResourceCache`] to the bridge.
///
/// Reads consult the cache before dispatching; mutations clear the
/// addressed resource id before dispatching, so stale data can never be
/// served even when the mutation itself fails partway downstream.
#[derive(Clone)]
pub struct ResourceClient {
    dispatcher: Arc<BridgeDispatcher>,
    cache: Arc<ResourceCache>,
}

impl ResourceClient {
    /// Create a client over the given dispatcher and cache.
    pub fn new(dispatcher: Arc<BridgeDispatcher>, cache: Arc<ResourceCache>) -> Self {
        Self { dispatcher, cache }
    }

    /// Read `resource_id` via `operation`, served from cache when the
    /// same normalized parameters were fetched before.
    ///
    /// # Errors
    ///
    /// Propagates [`BridgeError`] from the live call; a cache that cannot
    /// answer is a miss, never an error.
    pub fn fetch(
        &self,
        operation: &str,
        resource_id: &str,
        params: impl Serialize,
    ) -> Result<Value, BridgeError> {
        let params = serde_json::to_value(params).map_err(|e| BridgeError::Serialization {
            reason: e.to_string(),
        })?;

        if let Some(cached) = self.cache.get(resource_id, &params) {
            debug!(operation, resource_id, "served from cache");
            return Ok(cached);
        }

        let data = self.dispatcher.invoke_value(operation, params.clone())?;
        Ok(self.cache.set(resource_id, &params, data))
    }

    /// Mutate `resource_id` via `operation`.
    ///
    /// The cached responses for the resource id are cleared before the
    /// mutation is dispatched: an extra miss is cheaper than ever serving
    /// stale data when the mutation's downstream outcome is unknown.
    pub fn mutate(
        &self,
        operation: &str,
        resource_id: &str,
        params: impl Serialize,
    ) -> Result<Value, BridgeError> {
        let params = serde_json::to_value(params).map_err(|e| BridgeError::Serialization {
            reason: e.to_string(),
        })?;

        self.cache.clear(resource_id);
        self.dispatcher.invoke_value(operation, params)
    }

    /// The underlying cache, for observability and explicit lifecycle.
    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }
}
