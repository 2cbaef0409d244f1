// src/tasks/mod.rs

//! Asynchronous dispatch for operation runs. Decouples "run requested" from
//! "run executed": the caller observes only the Planned state synchronously
//! and polls the operation for completion.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::operations::OperationEngine;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker is gone; the operation stays Planned and must be
    /// resubmitted. There is no built-in retry policy.
    #[error("operation queue is unavailable")]
    QueueUnavailable,
}

/// Hands operation ids to a single background worker. Within the worker,
/// runs are strictly sequential; nothing serializes runs across multiple
/// dispatchers, so two dispatchers pointed at the same project can race on
/// its working directory.
pub struct OperationDispatcher {
    tx: mpsc::UnboundedSender<String>,
}

impl OperationDispatcher {
    /// Spawns the worker loop; the returned handle ends only when every
    /// dispatcher clone is dropped.
    pub fn spawn(engine: Arc<OperationEngine>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let handle = tokio::spawn(async move {
            info!("Operation worker started");
            while let Some(operation_id) = rx.recv().await {
                if let Err(e) = engine.run(&operation_id).await {
                    // Infrastructure fault: no status could be recorded, so
                    // the log line is the only trace of this run attempt.
                    error!("Operation {} run failed: {:#}", operation_id, e);
                }
            }
            info!("Operation worker stopped");
        });

        (Self { tx }, handle)
    }

    /// Queue a run. Failure is surfaced synchronously to the caller.
    pub fn enqueue(&self, operation_id: &str) -> Result<(), DispatchError> {
        self.tx
            .send(operation_id.to_string())
            .map_err(|_| DispatchError::QueueUnavailable)
    }
}
