//! The synchronous bridge into the worker context.
//!
//! Converts inherently asynchronous remote operations into blocking
//! synchronous calls: the [`BridgeDispatcher`] serializes a request to the
//! wire contract in [`protocol`], hands it to the worker daemon, and
//! blocks the calling thread until the response is signalled or the
//! bounded timeout elapses. Failures surface through [`BridgeError`].

mod dispatcher;
mod error;
mod protocol;

pub use dispatcher::{BridgeConfig, BridgeDispatcher, DEFAULT_RESPONSE_TIMEOUT};
pub use error::BridgeError;
pub use protocol::{BridgeRequest, BridgeResponse, STATUS_OK};
