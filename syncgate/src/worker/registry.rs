//! Name → handler lookup table.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::worker::handler::OperationHandler;

/// Registry mapping operation identifiers to handler implementations.
///
/// Built once during application wiring and handed to the worker daemon;
/// it is the worker's only dynamic-dispatch point. Registration is
/// last-wins: re-registering a name replaces the previous handler (logged,
/// since it usually indicates a wiring mistake).
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn OperationHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `operation_name`.
    pub fn register<H>(&mut self, operation_name: impl Into<String>, handler: H) -> &mut Self
    where
        H: OperationHandler,
    {
        self.register_arc(operation_name, Arc::new(handler))
    }

    /// Register an already shared handler under `operation_name`.
    pub fn register_arc(
        &mut self,
        operation_name: impl Into<String>,
        handler: Arc<dyn OperationHandler>,
    ) -> &mut Self {
        let operation_name = operation_name.into();
        if self
            .handlers
            .insert(operation_name.clone(), handler)
            .is_some()
        {
            warn!(operation = %operation_name, "replaced an existing operation handler");
        }
        self
    }

    /// Look up the handler for `operation_name`.
    pub fn lookup(&self, operation_name: &str) -> Option<Arc<dyn OperationHandler>> {
        self.handlers.get(operation_name).cloned()
    }

    /// Whether a handler is registered under `operation_name`.
    pub fn contains(&self, operation_name: &str) -> bool {
        self.handlers.contains_key(operation_name)
    }

    /// Registered operation names, in no particular order.
    pub fn operation_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
