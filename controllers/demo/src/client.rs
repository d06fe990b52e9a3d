//! Kubernetes access for `Demo` objects.
//!
//! [`DemoApi`] abstracts the two calls the reconciler makes so it can be
//! unit tested against an in-memory implementation.

use crate::error::ControllerError;
use crds::Demo;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use serde_json::json;

/// Read and status-write operations on `Demo` objects.
#[async_trait::async_trait]
pub trait DemoApi: Send + Sync {
    /// Fetch a Demo; `Ok(None)` when it does not exist.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Demo>, ControllerError>;

    /// Persist `demo.status` through the status subresource.
    ///
    /// The write is conditional on `demo.metadata.resourceVersion`; a stale
    /// object yields [`ControllerError::Conflict`].
    async fn replace_status(&self, demo: &Demo) -> Result<Demo, ControllerError>;
}

/// [`DemoApi`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeDemoApi {
    client: Client,
}

impl KubeDemoApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Demo> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait::async_trait]
impl DemoApi for KubeDemoApi {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Demo>, ControllerError> {
        Ok(self.api(namespace).get_opt(name).await?)
    }

    async fn replace_status(&self, demo: &Demo) -> Result<Demo, ControllerError> {
        let name = demo
            .metadata
            .name
            .as_deref()
            .ok_or(ControllerError::MissingObjectKey(".metadata.name"))?;
        let namespace = demo
            .metadata
            .namespace
            .as_deref()
            .ok_or(ControllerError::MissingObjectKey(".metadata.namespace"))?;

        // resourceVersion in the patch body makes the API server reject stale writes
        let status_patch = json!({
            "metadata": {
                "resourceVersion": demo.metadata.resource_version,
            },
            "status": demo.status,
        });

        let pp = PatchParams::default();
        self.api(namespace)
            .patch_status(name, &pp, &Patch::Merge(&status_patch))
            .await
            .map_err(|e| status_write_error(e, namespace, name))
    }
}

/// Maps a failed status write; HTTP 409 means the object changed since it was read.
pub(crate) fn status_write_error(err: kube::Error, namespace: &str, name: &str) -> ControllerError {
    match err {
        kube::Error::Api(ref resp) if resp.code == 409 => ControllerError::Conflict(format!(
            "Demo {}/{} was modified: {}",
            namespace, name, resp.message
        )),
        other => ControllerError::Kube(other),
    }
}
