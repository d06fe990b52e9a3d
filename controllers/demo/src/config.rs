//! Controller configuration loaded from environment variables.

use crate::error::ControllerError;
use std::env;
use std::time::Duration;

/// Default per-reconciliation deadline in seconds
pub const DEFAULT_RECONCILE_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the Demo Controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; `None` watches all namespaces
    pub namespace: Option<String>,
    /// Deadline applied to each reconciliation
    pub reconcile_timeout: Duration,
}

impl ControllerConfig {
    /// Reads `WATCH_NAMESPACE` and `RECONCILE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("WATCH_NAMESPACE")
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty());

        let timeout_secs = match lookup("RECONCILE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ControllerError::InvalidConfig(format!(
                    "RECONCILE_TIMEOUT_SECS must be a positive integer, got '{raw}': {e}"
                ))
            })?,
            None => DEFAULT_RECONCILE_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            namespace,
            reconcile_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
