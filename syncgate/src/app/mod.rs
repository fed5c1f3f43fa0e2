//! Application lifecycle: configuration, bootstrap, errors.

mod bootstrap;
mod config;
mod error;

pub use bootstrap::SyncGateApp;
pub use config::{AppConfig, CacheConfig};
pub use error::AppError;
