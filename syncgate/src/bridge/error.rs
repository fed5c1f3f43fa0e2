//! Bridge error taxonomy.
//!
//! Every bridge-originated failure becomes a synchronous error at the call
//! site — never silently swallowed. The three kinds have distinct
//! recovery semantics:
//!
//! - [`BridgeError::Serialization`] - the payload cannot cross the
//!   boundary; raised before anything is transmitted, fatal to the call
//! - [`BridgeError::Transport`] - the worker context is unreachable or
//!   the wait timed out; unrecoverable, no bridge-level retry
//! - [`BridgeError::Remote`] - the worker ran the operation and the
//!   remote call failed; façades decide which statuses are tolerable

use serde_json::Value;
use thiserror::Error;

/// Errors raised by [`BridgeDispatcher::invoke`](crate::bridge::BridgeDispatcher::invoke).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The payload is not representable as a data-interchange value.
    #[error("payload is not representable as a data-interchange value: {reason}")]
    Serialization { reason: String },

    /// The worker context is unreachable, dropped the request, or the
    /// bounded wait elapsed.
    #[error("bridge transport failed: {reason}")]
    Transport { reason: String },

    /// The operation ran and the underlying remote call failed.
    #[error("remote operation failed: {status} {status_text}")]
    Remote {
        status: u16,
        status_text: String,
        error_info: Value,
    },
}

impl BridgeError {
    /// The remote status code, when this is a [`BridgeError::Remote`].
    pub fn status(&self) -> Option<u16> {
        match self {
            BridgeError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a remote "not found" failure.
    ///
    /// Façades commonly tolerate this status (a read of a deleted
    /// resource) while treating every other failure as fatal.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
