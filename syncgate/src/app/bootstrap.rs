//! Application bootstrap implementation.
//!
//! `SyncGateApp` owns the whole sync-over-async machinery: a dedicated
//! Tokio runtime, the worker daemon running on it, the dispatcher, and
//! the caches. It is constructed once at start-up and passed (or its
//! handles are passed) to the components that need it — an explicit
//! service instance with an explicit `shutdown()`, not an ambient
//! singleton, so tests can build and tear down as many as they like.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::bridge::BridgeDispatcher;
use crate::cache::{CachePerformance, MetadataCache, ResourceCache};
use crate::client::{MetadataClient, ResourceClient};
use crate::worker::{HandlerRegistry, WorkerDaemon};

/// The assembled application: runtime, worker daemon, dispatcher, caches.
///
/// The calling side (this struct's owner) is any ordinary thread; the
/// worker daemon runs on the owned runtime. Dropping the app without
/// calling [`shutdown`](Self::shutdown) also stops the daemon, since the
/// runtime and the request channel go away with it.
///
/// # Example
///
/// ```ignore
/// use syncgate::{AppConfig, HandlerRegistry, SyncGateApp};
///
/// let mut registry = HandlerRegistry::new();
/// registry.register("resourceGet", my_get_handler);
///
/// let app = SyncGateApp::start(AppConfig::new(), registry)?;
/// let client = app.resource_client();
/// let data = client.fetch("resourceGet", "X", json!({"id": "X"}))?;
/// app.shutdown();
/// ```
pub struct SyncGateApp {
    dispatcher: Arc<BridgeDispatcher>,
    resource_cache: Arc<ResourceCache>,
    metadata_cache: Arc<MetadataCache>,
    shutdown: CancellationToken,
    runtime: Runtime,
}

impl std::fmt::Debug for SyncGateApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncGateApp")
            .field("dispatcher", &self.dispatcher)
            .field("resource_cache", &self.resource_cache)
            .field("metadata_cache", &self.metadata_cache)
            .field("shutdown", &self.shutdown)
            .field("runtime", &"Runtime")
            .finish()
    }
}

impl SyncGateApp {
    /// Start the application with the given configuration and handlers.
    ///
    /// This method:
    /// 1. Validates the configuration
    /// 2. Creates a dedicated Tokio runtime
    /// 3. Spawns the worker daemon with the supplied registry
    /// 4. Wires the dispatcher and caches
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `registry` - Operation handlers supplied by the surrounding
    ///   domain logic
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the runtime
    /// cannot be created.
    pub fn start(config: AppConfig, registry: HandlerRegistry) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Config)?;

        let runtime = Runtime::new().map_err(|e| AppError::RuntimeCreation(e.to_string()))?;

        let registry = Arc::new(registry);
        let (daemon, request_tx) = WorkerDaemon::new(config.worker.clone(), Arc::clone(&registry));

        let shutdown = CancellationToken::new();
        runtime.spawn(daemon.run(shutdown.clone()));

        info!(
            operations = registry.len(),
            response_timeout_ms = config.bridge.response_timeout.as_millis() as u64,
            caching_enabled = config.cache.enabled,
            "syncgate application started"
        );

        Ok(Self {
            dispatcher: Arc::new(BridgeDispatcher::new(request_tx, config.bridge.clone())),
            resource_cache: Arc::new(ResourceCache::new(config.cache.enabled)),
            metadata_cache: Arc::new(MetadataCache::new(config.cache.enabled)),
            shutdown,
            runtime,
        })
    }

    /// The synchronous dispatcher for direct, uncached invokes.
    pub fn dispatcher(&self) -> Arc<BridgeDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// The response cache.
    pub fn resource_cache(&self) -> Arc<ResourceCache> {
        Arc::clone(&self.resource_cache)
    }

    /// The field-aware metadata cache.
    pub fn metadata_cache(&self) -> Arc<MetadataCache> {
        Arc::clone(&self.metadata_cache)
    }

    /// A cache-aware resource client over this app's dispatcher.
    pub fn resource_client(&self) -> ResourceClient {
        ResourceClient::new(self.dispatcher(), self.resource_cache())
    }

    /// A field-aware metadata client over this app's dispatcher.
    pub fn metadata_client(&self) -> MetadataClient {
        MetadataClient::new(self.dispatcher(), self.metadata_cache())
    }

    /// Snapshot the response cache performance counters.
    pub fn performance(&self) -> CachePerformance {
        self.resource_cache.performance()
    }

    /// Shut the application down.
    ///
    /// Signals the worker daemon, then drops the runtime, blocking until
    /// spawned tasks have wound down. Must be called from a thread
    /// outside the runtime (the same constraint as `invoke`).
    pub fn shutdown(self) {
        info!("shutting down syncgate application");
        self.shutdown.cancel();
        drop(self.runtime);
        info!("syncgate application stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeError;
    use crate::worker::handler_fn;
    use serde_json::json;
    use std::time::Duration;

    fn echo_registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register("echo", handler_fn(|payload| async move { Ok(payload) }));
        registry
    }

    #[test]
    fn test_start_invoke_shutdown() {
        let app = SyncGateApp::start(AppConfig::new(), echo_registry()).unwrap();

        let data = app.dispatcher().invoke("echo", json!({"id": "X"})).unwrap();
        assert_eq!(data, json!({"id": "X"}));

        app.shutdown();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AppConfig::new().with_channel_capacity(0);
        let err = SyncGateApp::start(config, echo_registry()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invoke_after_shutdown_is_transport_failure() {
        let app = SyncGateApp::start(
            AppConfig::new().with_response_timeout(Duration::from_millis(500)),
            echo_registry(),
        )
        .unwrap();
        let dispatcher = app.dispatcher();
        app.shutdown();

        let err = dispatcher.invoke("echo", json!({})).unwrap_err();
        assert!(matches!(err, BridgeError::Transport { .. }));
    }

    #[test]
    fn test_caches_follow_config_flag() {
        let app = SyncGateApp::start(
            AppConfig::new().with_caching_enabled(false),
            echo_registry(),
        )
        .unwrap();

        assert!(!app.resource_cache().is_enabled());
        assert!(!app.metadata_cache().is_enabled());

        app.shutdown();
    }

    #[test]
    fn test_drop_without_shutdown_does_not_hang() {
        let app = SyncGateApp::start(AppConfig::new(), echo_registry()).unwrap();
        drop(app);
    }
}
