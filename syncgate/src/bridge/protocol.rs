//! Wire contract crossing the bridge.
//!
//! A [`BridgeRequest`]/[`BridgeResponse`] pair is created fresh per call,
//! processed exactly once, and carries only data-interchange values: plain
//! records, sequences, and primitives. No function values, no cyclic
//! references, no live handles cross in either direction. Field names
//! follow the wire schema (`operationName`, `statusText`, `errorInfo`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::worker::OperationError;

/// Status code for a successful operation.
pub const STATUS_OK: u16 = 200;

/// A single operation request crossing into the worker context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    /// Identifier the worker uses to route to a registered handler.
    pub operation_name: String,

    /// Operation parameters as a data-interchange value.
    pub payload: Value,
}

impl BridgeRequest {
    /// Create a request for `operation_name` with the given payload.
    pub fn new(operation_name: impl Into<String>, payload: Value) -> Self {
        Self {
            operation_name: operation_name.into(),
            payload,
        }
    }
}

/// The worker's answer to a [`BridgeRequest`]. Produced exactly once per
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    /// Result data on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Status code; `200` on success.
    pub status: u16,

    /// Human-readable status line.
    pub status_text: String,

    /// Structured failure detail. Present exactly when the operation
    /// failed; its presence is what the dispatcher turns into an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<Value>,
}

impl BridgeResponse {
    /// Build a success response carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            data: Some(data),
            status: STATUS_OK,
            status_text: "OK".to_string(),
            error_info: None,
        }
    }

    /// Build a failure response.
    ///
    /// # Arguments
    ///
    /// * `status` - Non-success status code
    /// * `status_text` - Status line matching the code
    /// * `error_info` - Structured detail carried back to the caller
    pub fn failure(status: u16, status_text: impl Into<String>, error_info: Value) -> Self {
        Self {
            data: None,
            status,
            status_text: status_text.into(),
            error_info: Some(error_info),
        }
    }

    /// Whether this response reports success.
    pub fn is_success(&self) -> bool {
        self.error_info.is_none()
    }
}

impl From<OperationError> for BridgeResponse {
    fn from(error: OperationError) -> Self {
        let info = error.to_error_info();
        Self::failure(error.status, error.status_text, info)
    }
}
