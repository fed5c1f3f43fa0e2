//! Operation handler contract.
//!
//! Handlers are the only extension point of the worker context: plain
//! values satisfying a single `payload -> result` contract, registered by
//! name in a [`HandlerRegistry`](crate::worker::HandlerRegistry). No
//! inheritance hierarchy — the registry is a lookup table, not
//! polymorphism. A handler may internally perform multiple sequential or
//! concurrent sub-calls (pagination, fan-out); the worker awaits whatever
//! it returns to completion.

use std::future::Future;
use std::pin::Pin;

use serde_json::{json, Value};
use thiserror::Error;

/// Boxed future type for dyn-compatible async handler methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a single handler invocation.
pub type HandlerResult = Result<Value, OperationError>;

/// An asynchronous remote operation, dispatched by name.
///
/// Implementations must produce a `'static` future: anything the future
/// needs is cloned or moved in, never borrowed from the handler, so the
/// worker can drive it independently of the registry borrow.
pub trait OperationHandler: Send + Sync + 'static {
    /// Execute the operation with the given payload.
    ///
    /// Returns the operation's result data, or a structured
    /// [`OperationError`] that the worker converts into the response's
    /// `errorInfo`.
    fn call(&self, payload: Value) -> BoxFuture<'static, HandlerResult>;
}

/// Structured failure reported by an operation handler.
///
/// Carried back across the bridge as the response's `errorInfo`; the
/// status code decides how façades treat the failure.
#[derive(Debug, Clone, Error)]
#[error("{status} {status_text}")]
pub struct OperationError {
    /// Non-success status code.
    pub status: u16,

    /// Status line matching the code.
    pub status_text: String,

    /// Optional structured detail.
    pub detail: Option<Value>,
}

impl OperationError {
    /// Create an error with the given status code and line.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            detail: None,
        }
    }

    /// Attach structured detail.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// A 400 "Bad Request" error for malformed payloads.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(json!({"message": message.into()}))
    }

    /// A 404 "Not Found" error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(json!({"message": message.into()}))
    }

    /// A 500 "Internal Error".
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, "Internal Error").with_detail(json!({"message": message.into()}))
    }

    /// A 501 "Not Implemented" error for unregistered operation names.
    pub fn unknown_operation(operation_name: &str) -> Self {
        Self::new(501, "Not Implemented").with_detail(json!({
            "message": format!("no handler registered for operation '{operation_name}'"),
        }))
    }

    /// The data-interchange form carried as the response's `errorInfo`.
    pub fn to_error_info(&self) -> Value {
        json!({
            "status": self.status,
            "statusText": self.status_text,
            "detail": self.detail,
        })
    }
}

/// Adapt an async closure into an [`OperationHandler`].
///
/// # Example
///
/// ```ignore
/// let handler = handler_fn(|payload| async move {
///     Ok(json!({"echo": payload}))
/// });
/// registry.register("echo", handler);
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler { f }
}

/// [`OperationHandler`] backed by a plain async closure. Built with
/// [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

impl<F, Fut> OperationHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, payload: Value) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.f)(payload))
    }
}
