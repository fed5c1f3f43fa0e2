//! Worker daemon executing bridge requests.
//!
//! The [`WorkerDaemon`] is the independently scheduled side of the bridge:
//! a long-running task on the application's Tokio runtime that
//! - receives one [`WorkItem`] at a time via a channel,
//! - routes it by operation name through the [`HandlerRegistry`],
//! - drives the handler future to completion (panic-isolated),
//! - and produces exactly one [`BridgeResponse`] per request.
//!
//! # Architecture
//!
//! ```text
//! calling thread                      Tokio runtime
//!      │                                   │
//!      ├── WorkItem ──► request channel ──►│ WorkerDaemon
//!      │                                   │   ├── registry lookup ──► miss ──► 501 response
//!      │                                   │   └── spawn handler, await
//!      │                                   │         ├── Ok(data)  ──► 200 response
//!      │                                   │         ├── Err(e)    ──► e.status response
//!      │                                   │         └── panic     ──► 500 response
//!      │◄── reply channel ◄────────────────┤
//! ```
//!
//! Requests are processed strictly one at a time: the calling contract
//! admits a single outstanding call, and sequential processing keeps the
//! response order total. A request is never abandoned — if the caller
//! times out, the handler still runs to completion and the late response
//! send fails silently.

use std::sync::mpsc::Sender as ReplySender;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::{BridgeRequest, BridgeResponse};
use crate::worker::handler::OperationError;
use crate::worker::registry::HandlerRegistry;
use crate::worker::state::RequestState;

// =============================================================================
// Configuration
// =============================================================================

/// Default capacity of the request channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the worker daemon.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Request channel capacity.
    pub channel_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

// =============================================================================
// Work item
// =============================================================================

/// A bridge request paired with its reply channel.
///
/// The reply side is a `std::sync::mpsc` sender so the blocked calling
/// thread can wait on a real OS-level primitive; sending from the async
/// side never blocks.
pub struct WorkItem {
    /// The request to execute.
    pub request: BridgeRequest,

    /// Reply channel back to the blocked caller.
    pub reply_tx: ReplySender<BridgeResponse>,

    /// When the calling side handed the item off, for latency tracing.
    pub submitted_at: Instant,
}

impl WorkItem {
    /// Pair a request with its reply channel.
    pub fn new(request: BridgeRequest, reply_tx: ReplySender<BridgeResponse>) -> Self {
        Self {
            request,
            reply_tx,
            submitted_at: Instant::now(),
        }
    }

    /// Send the response back to the caller.
    ///
    /// A send failure means the caller gave up (timed out) and is not an
    /// error here; the outcome was already logged by the daemon.
    pub fn respond(self, response: BridgeResponse) {
        if self.reply_tx.send(response).is_err() {
            debug!(
                operation = %self.request.operation_name,
                "caller gave up before the response was ready"
            );
        }
    }
}

// =============================================================================
// Worker daemon
// =============================================================================

/// The worker execution context.
///
/// Owns the request channel receiver and the handler registry. Runs as a
/// long-lived task until its cancellation token fires or every sender is
/// dropped.
pub struct WorkerDaemon {
    registry: Arc<HandlerRegistry>,
    request_rx: mpsc::Receiver<WorkItem>,
}

impl WorkerDaemon {
    /// Create a daemon with its request channel.
    ///
    /// Returns the daemon and the sender the dispatcher uses to submit
    /// work.
    ///
    /// # Arguments
    ///
    /// * `config` - Daemon configuration
    /// * `registry` - Operation name → handler table
    pub fn new(config: WorkerConfig, registry: Arc<HandlerRegistry>) -> (Self, mpsc::Sender<WorkItem>) {
        let (request_tx, request_rx) = mpsc::channel(config.channel_capacity);
        let daemon = Self {
            registry,
            request_rx,
        };
        (daemon, request_tx)
    }

    /// Run the daemon until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            operations = self.registry.len(),
            "worker daemon starting"
        );

        let Self {
            registry,
            mut request_rx,
        } = self;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("worker daemon shutting down");
                    break;
                }

                maybe_item = request_rx.recv() => {
                    match maybe_item {
                        Some(item) => Self::handle_request(&registry, item).await,
                        None => {
                            info!("request channel closed, worker daemon stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Execute one request and send its response.
    async fn handle_request(registry: &Arc<HandlerRegistry>, item: WorkItem) {
        let operation = item.request.operation_name.clone();
        let submitted_at = item.submitted_at;

        debug!(
            operation = %operation,
            state = %RequestState::Received,
            queued_ms = submitted_at.elapsed().as_millis() as u64,
            "received bridge request"
        );
        debug!(
            operation = %operation,
            state = %RequestState::Dispatching,
            "dispatching bridge request"
        );

        let Some(handler) = registry.lookup(&operation) else {
            warn!(operation = %operation, "no handler registered");
            item.respond(BridgeResponse::from(OperationError::unknown_operation(
                &operation,
            )));
            return;
        };

        debug!(operation = %operation, state = %RequestState::Running, "running handler");

        // Spawn so a panicking handler is isolated: the daemon survives
        // and the caller still receives a structured failure. The spawn is
        // awaited immediately, keeping processing strictly sequential.
        let payload = item.request.payload.clone();
        let outcome = tokio::spawn(handler.call(payload)).await;

        let (state, response) = match outcome {
            Ok(Ok(data)) => (RequestState::Succeeded, BridgeResponse::success(data)),
            Ok(Err(error)) => {
                warn!(
                    operation = %operation,
                    status = error.status,
                    "operation failed: {error}"
                );
                (RequestState::Failed, BridgeResponse::from(error))
            }
            Err(join_error) => {
                let message = if join_error.is_panic() {
                    "operation handler panicked"
                } else {
                    "operation handler was aborted"
                };
                warn!(operation = %operation, "{message}");
                (
                    RequestState::Failed,
                    BridgeResponse::from(OperationError::internal(message)),
                )
            }
        };

        debug!(
            operation = %operation,
            state = %state,
            duration_ms = submitted_at.elapsed().as_millis() as u64,
            "request complete"
        );

        item.respond(response);
        debug!(operation = %operation, state = %RequestState::ResponseReady, "response signalled");
    }
}

// =============================================================================
// Tests
// =============================================================================
