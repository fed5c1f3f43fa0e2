//! Application configuration.
//!
//! `AppConfig` combines the configuration of every component the
//! application wires together: the bridge dispatcher, the worker daemon,
//! and the caches. It is passed once to
//! [`SyncGateApp::start`](crate::app::SyncGateApp::start).

use std::time::Duration;

use crate::bridge::BridgeConfig;
use crate::worker::WorkerConfig;

/// Cache configuration for the application.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Whether caching is enabled at startup. Can be toggled at runtime
    /// through the cache handles.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level configuration combining all component configs.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Bridge dispatcher configuration.
    pub bridge: BridgeConfig,

    /// Worker daemon configuration.
    pub worker: WorkerConfig,

    /// Cache configuration.
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Create a config with defaults for every component.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bound on the wait for a response.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.bridge.response_timeout = timeout;
        self
    }

    /// Set the worker request channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.worker.channel_capacity = capacity;
        self
    }

    /// Enable or disable caching at startup.
    pub fn with_caching_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// Check the config for values the components cannot operate with.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.worker.channel_capacity == 0 {
            return Err("worker channel capacity must be at least 1".to_string());
        }
        if self.bridge.response_timeout.is_zero() {
            return Err("response timeout must be non-zero".to_string());
        }
        Ok(())
    }
}
