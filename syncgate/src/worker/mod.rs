//! The worker execution context.
//!
//! Everything that runs on the independently scheduled side of the
//! bridge: the [`OperationHandler`] contract supplied by domain logic, the
//! [`HandlerRegistry`] lookup table, and the [`WorkerDaemon`] that drives
//! one request at a time to completion.

mod daemon;
mod handler;
mod registry;
mod state;

pub use daemon::{WorkItem, WorkerConfig, WorkerDaemon, DEFAULT_CHANNEL_CAPACITY};
pub use handler::{handler_fn, BoxFuture, FnHandler, HandlerResult, OperationError, OperationHandler};
pub use registry::HandlerRegistry;
pub use state::RequestState;
