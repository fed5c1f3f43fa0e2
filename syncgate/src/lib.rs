//! Syncgate - synchronous gateway over asynchronous remote operations.
//!
//! Callers with a strictly synchronous contract (every call appears to
//! run to completion, in order, with no visible concurrency) invoke
//! remote operations whose implementation is asynchronous and
//! network-bound. Syncgate bridges the two worlds and layers a response
//! cache on the synchronous side:
//!
//! ```text
//! caller ──► ResourceClient / MetadataClient ──► cache hit ──► return
//!                         │ miss
//!                         ▼
//!               BridgeDispatcher (blocks the calling thread)
//!                         │ channel
//!                         ▼
//!               WorkerDaemon on a dedicated Tokio runtime
//!                         │ registry lookup
//!                         ▼
//!               OperationHandler (async, may paginate / fan out)
//! ```
//!
//! Wiring starts with [`SyncGateApp::start`], which owns the runtime and
//! hands out the dispatcher, caches, and clients.

pub mod app;
pub mod bridge;
pub mod cache;
pub mod client;
pub mod telemetry;
pub mod worker;

pub use app::{AppConfig, AppError, SyncGateApp};
pub use bridge::{BridgeDispatcher, BridgeError, BridgeRequest, BridgeResponse};
pub use cache::{digest, CachePerformance, MetadataCache, ResourceCache};
pub use client::{MetadataClient, ResourceClient};
pub use worker::{handler_fn, HandlerRegistry, OperationError, OperationHandler};
