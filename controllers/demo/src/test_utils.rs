//! Test utilities for unit testing the reconciler
//!
//! Provides an in-memory [`DemoApi`] and helpers for building test objects.

use crate::client::DemoApi;
use crate::error::ControllerError;
use crds::{Demo, DemoSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Helper to create a test Demo CRD
pub fn create_test_demo(name: &str, namespace: &str, replicas: i32) -> Demo {
    Demo {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: DemoSpec {
            message: format!("hello from {name}"),
            replicas,
        },
        status: None,
    }
}

/// Helper to build the error the API server returns for a failed request
pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(
        serde_json::from_value(json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": format!("mock {reason}"),
            "reason": reason,
            "code": code,
        }))
        .expect("valid API error body"),
    )
}

/// In-memory Demo store with resourceVersion checks
#[derive(Clone, Default)]
pub struct MockDemoApi {
    demos: Arc<Mutex<HashMap<(String, String), Demo>>>,
    next_version: Arc<Mutex<u64>>,
    gets: Arc<Mutex<usize>>,
    status_writes: Arc<Mutex<usize>>,
    fail_next_status_write: Arc<Mutex<bool>>,
    fail_gets: Arc<Mutex<bool>>,
}

impl MockDemoApi {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    fn key(namespace: &str, name: &str) -> (String, String) {
        (namespace.to_string(), name.to_string())
    }

    fn bump_version(&self) -> String {
        let mut version = self.next_version.lock().unwrap();
        *version += 1;
        version.to_string()
    }

    /// Add a Demo to the store (for test setup)
    pub fn add_demo(&self, mut demo: Demo) {
        demo.metadata.resource_version = Some(self.bump_version());
        let key = Self::key(
            demo.metadata.namespace.as_deref().unwrap_or_default(),
            demo.metadata.name.as_deref().unwrap_or_default(),
        );
        self.demos.lock().unwrap().insert(key, demo);
    }

    /// Remove a Demo from the store
    pub fn delete_demo(&self, namespace: &str, name: &str) {
        self.demos.lock().unwrap().remove(&Self::key(namespace, name));
    }

    /// Current stored copy of a Demo
    pub fn stored(&self, namespace: &str, name: &str) -> Option<Demo> {
        self.demos.lock().unwrap().get(&Self::key(namespace, name)).cloned()
    }

    /// Make the next status write fail with a conflict
    pub fn fail_next_status_write(&self) {
        *self.fail_next_status_write.lock().unwrap() = true;
    }

    /// Make every get fail with an API error
    pub fn fail_gets(&self) {
        *self.fail_gets.lock().unwrap() = true;
    }

    pub fn get_count(&self) -> usize {
        *self.gets.lock().unwrap()
    }

    pub fn status_write_count(&self) -> usize {
        *self.status_writes.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DemoApi for MockDemoApi {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Demo>, ControllerError> {
        *self.gets.lock().unwrap() += 1;
        if *self.fail_gets.lock().unwrap() {
            return Err(ControllerError::Kube(api_error(503, "ServiceUnavailable")));
        }
        Ok(self.stored(namespace, name))
    }

    async fn replace_status(&self, demo: &Demo) -> Result<Demo, ControllerError> {
        let namespace = demo.metadata.namespace.clone().unwrap_or_default();
        let name = demo.metadata.name.clone().unwrap_or_default();

        {
            let mut fail = self.fail_next_status_write.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(ControllerError::Conflict(format!(
                    "Demo {namespace}/{name} was modified"
                )));
            }
        }

        let key = Self::key(&namespace, &name);
        let current_version = self
            .demos
            .lock()
            .unwrap()
            .get(&key)
            .map(|d| d.metadata.resource_version.clone());
        match current_version {
            None => Err(ControllerError::Conflict(format!(
                "Demo {namespace}/{name} no longer exists"
            ))),
            Some(version) if version != demo.metadata.resource_version => Err(
                ControllerError::Conflict(format!("Demo {namespace}/{name} was modified")),
            ),
            Some(_) => {
                let new_version = self.bump_version();
                let mut demos = self.demos.lock().unwrap();
                let stored = demos
                    .get_mut(&key)
                    .ok_or_else(|| ControllerError::Conflict(format!("Demo {namespace}/{name} vanished")))?;
                stored.status = demo.status.clone();
                stored.metadata.resource_version = Some(new_version);
                *self.status_writes.lock().unwrap() += 1;
                Ok(stored.clone())
            }
        }
    }
}
