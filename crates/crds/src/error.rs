//! CRD crate errors

use thiserror::Error;

/// Errors raised while registering or rendering resource types
#[derive(Debug, Error)]
pub enum CrdError {
    /// The same group/version/kind was registered twice
    #[error("Kind already registered: {0}")]
    AlreadyRegistered(String),

    /// YAML rendering failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}
