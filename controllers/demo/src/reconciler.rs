//! Reconciliation logic for Demo CRDs.
//!
//! Mirrors `spec.replicas` into `status.availableReplicas`, stamps
//! `status.lastUpdated`, and asks to be called again after a minute.

use crate::client::DemoApi;
use crate::context::ReconcileContext;
use crate::error::ControllerError;
use chrono::{DateTime, Utc};
use crds::{Demo, DemoSpec, DemoStatus};
use kube_runtime::controller::Action;
use kube_runtime::reflector::ObjectRef;
use std::time::Duration;
use tracing::{debug, error, info};

/// Delay before a successfully reconciled Demo is reconciled again
pub const REQUEUE_AFTER: Duration = Duration::from_secs(60);

/// Status the controller reports for `spec` at time `now`.
///
/// `availableReplicas` is a copy of the desired count, not a measurement.
pub fn observed_status(spec: &DemoSpec, now: DateTime<Utc>) -> DemoStatus {
    DemoStatus {
        available_replicas: spec.replicas,
        last_updated: Some(now),
    }
}

/// Reconciles Demo resources.
pub struct Reconciler {
    api: Box<dyn DemoApi>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(api: Box<dyn DemoApi>) -> Self {
        Self { api }
    }

    /// Reconciles the Demo identified by `key`.
    ///
    /// This method:
    /// 1. Fetches the Demo (a missing object is already reconciled)
    /// 2. Copies the desired replica count into status and stamps the time
    /// 3. Writes the status subresource
    ///
    /// A failed status write is logged and returned unchanged; the caller
    /// owns retry scheduling.
    pub async fn reconcile(
        &self,
        key: &ObjectRef<Demo>,
        ctx: &ReconcileContext,
    ) -> Result<Action, ControllerError> {
        let name = key.name.as_str();
        let namespace = key
            .namespace
            .as_deref()
            .ok_or(ControllerError::MissingObjectKey(".metadata.namespace"))?;

        info!("Reconciling Demo {}/{}", namespace, name);

        let Some(mut demo) = ctx.run("get", self.api.get(namespace, name)).await? else {
            debug!("Demo {}/{} not found, nothing to reconcile", namespace, name);
            return Ok(Action::await_change());
        };

        let status = observed_status(&demo.spec, Utc::now());
        let available = status.available_replicas;
        demo.status = Some(status);

        match ctx.run("update status", self.api.replace_status(&demo)).await {
            Ok(_) => {
                info!(
                    "Updated Demo {}/{} status: {} available replicas",
                    namespace, name, available
                );
                Ok(Action::requeue(REQUEUE_AFTER))
            }
            Err(e) => {
                error!("Failed to update Demo {}/{} status: {}", namespace, name, e);
                Err(e)
            }
        }
    }
}
