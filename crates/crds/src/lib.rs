//! Demo Operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the Demo controller, plus the
//! explicit type registry and the RBAC rules the controller needs.
//!
//! Types are not registered implicitly. Callers build a [`Scheme`] and call
//! [`add_to_scheme`] (or [`Scheme::register`] per type) once at startup.

pub mod demo;
pub mod error;
pub mod rbac;
pub mod scheme;

pub use demo::*;
pub use error::CrdError;
pub use scheme::{Registration, Scheme};

/// Registers every resource type defined in this crate.
pub fn add_to_scheme(scheme: &mut Scheme) -> Result<(), CrdError> {
    scheme.register::<Demo>()?;
    Ok(())
}
