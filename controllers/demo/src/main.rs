//! Demo Controller
//!
//! Reconciles `Demo` custom resources: the desired replica count in
//! `spec.replicas` is mirrored into `status.availableReplicas`, the status is
//! stamped with the reconciliation time, and every Demo is revisited once a
//! minute.

mod backoff;
mod client;
mod config;
mod context;
mod controller;
mod error;
mod reconciler;
#[cfg(test)]
mod test_utils;

use crate::config::ControllerConfig;
use crate::controller::Controller;
use crate::error::ControllerError;
use crds::Scheme;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kube=info")),
        )
        .init();

    info!("Starting Demo Controller");

    // kube is built with rustls-tls; select the ring provider before any client is created
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Reconcile timeout: {}s", config.reconcile_timeout.as_secs());

    // Register resource types before anything is (de)serialized
    let mut scheme = Scheme::new();
    crds::add_to_scheme(&mut scheme)?;
    for registration in scheme.registrations() {
        info!("  Registered kind: {} ({})", registration.kind, registration.api_version());
    }

    // Initialize and run controller
    let controller = Controller::new(&config, &scheme).await?;
    controller.run().await?;

    Ok(())
}
