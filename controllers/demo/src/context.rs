//! Per-reconciliation context.
//!
//! Carries the deadline and the cancellation token that bound every API call
//! made during one reconciliation.

use crate::error::ControllerError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation handle for one reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl ReconcileContext {
    /// Creates a context whose deadline is `timeout` from now.
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            cancel,
        }
    }

    /// Runs `fut`, giving up when the deadline passes or the token is cancelled.
    ///
    /// `operation` names the call in the returned error.
    pub async fn run<F, T>(&self, operation: &str, fut: F) -> Result<T, ControllerError>
    where
        F: Future<Output = Result<T, ControllerError>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ControllerError::Cancelled(operation.to_string())),
            result = tokio::time::timeout_at(self.deadline, fut) => match result {
                Ok(inner) => inner,
                Err(_) => Err(ControllerError::DeadlineExceeded(operation.to_string())),
            },
        }
    }
}
