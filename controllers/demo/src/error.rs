//! Controller-specific error types.
//!
//! This module defines error types specific to the Demo Controller
//! that are not covered by upstream library errors.

use crds::CrdError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Demo Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Status write rejected because the object changed since it was read
    #[error("Conflict writing status: {0}")]
    Conflict(String),

    /// Type registry could not be built
    #[error("Scheme error: {0}")]
    Scheme(#[from] CrdError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Object is missing a key the controller needs
    #[error("Missing object key: {0}")]
    MissingObjectKey(&'static str),

    /// Reconciliation deadline passed before an API call finished
    #[error("Deadline exceeded during {0}")]
    DeadlineExceeded(String),

    /// Shutdown was requested while an API call was in flight
    #[error("Cancelled during {0}")]
    Cancelled(String),
}
