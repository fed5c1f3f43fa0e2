//! Per-request lifecycle states.
//!
//! A request moves `Received → Dispatching → Running → Succeeded|Failed →
//! ResponseReady`. Both terminal outcomes produce a response; there is no
//! abandoned state, because a request once dispatched is always awaited to
//! completion even if the calling side has timed out. The states are
//! surfaced through tracing fields for observability.

use std::fmt;

/// Lifecycle state of a single bridge request inside the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Pulled off the request channel.
    Received,
    /// Looking up the handler by operation name.
    Dispatching,
    /// Handler future in flight.
    Running,
    /// Handler completed with data.
    Succeeded,
    /// Handler completed with a structured error (or panicked).
    Failed,
    /// Response handed to the reply channel.
    ResponseReady,
}

impl RequestState {
    /// Whether this state is a terminal operation outcome.
    pub fn is_outcome(&self) -> bool {
        matches!(self, RequestState::Succeeded | RequestState::Failed)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Received => "received",
            RequestState::Dispatching => "dispatching",
            RequestState::Running => "running",
            RequestState::Succeeded => "succeeded",
            RequestState::Failed => "failed",
            RequestState::ResponseReady => "response_ready",
        };
        write!(f, "{name}")
    }
}
