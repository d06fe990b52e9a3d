//! Demo CRD
//!
//! Carries a free-text message and a desired replica count. The controller
//! mirrors the desired count into status on every reconciliation.

use chrono::{DateTime, Utc};
use kube::CustomResource;
use kube::core::ObjectList;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "apps.my.domain",
    version = "v1",
    kind = "Demo",
    plural = "demos",
    namespaced,
    status = "DemoStatus",
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Available", "type":"integer", "jsonPath":".status.availableReplicas"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DemoSpec {
    /// Custom message to be displayed
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Number of desired replicas
    #[serde(default)]
    pub replicas: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DemoStatus {
    /// Number of available replicas (mirrors `spec.replicas`)
    #[serde(default)]
    pub available_replicas: i32,

    /// Last time the status was written by the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// List wrapper returned by bulk queries against `demos`
pub type DemoList = ObjectList<Demo>;
