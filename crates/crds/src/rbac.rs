//! RBAC rules required by the Demo controller
//!
//! The rules are declared here so they can be rendered next to the CRDs.
//! Enforcement is the API server's job.

use crate::Demo;
use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;

/// Verbs on the `demos` resource itself
pub const DEMO_VERBS: &[&str] = &["get", "list", "watch", "create", "update", "patch", "delete"];

/// Verbs on the `demos/status` subresource
pub const DEMO_STATUS_VERBS: &[&str] = &["get", "update", "patch"];

/// Verbs on the `demos/finalizers` subresource
pub const DEMO_FINALIZER_VERBS: &[&str] = &["update"];

fn rule(group: &str, resource: String, verbs: &[&str]) -> PolicyRule {
    PolicyRule {
        api_groups: Some(vec![group.to_string()]),
        resources: Some(vec![resource]),
        verbs: verbs.iter().map(|v| (*v).to_string()).collect(),
        ..Default::default()
    }
}

/// Policy rules for `demos`, `demos/status` and `demos/finalizers`.
pub fn demo_policy_rules() -> Vec<PolicyRule> {
    let group = Demo::group(&());
    let plural = Demo::plural(&());
    vec![
        rule(&group, plural.to_string(), DEMO_VERBS),
        rule(&group, format!("{plural}/status"), DEMO_STATUS_VERBS),
        rule(&group, format!("{plural}/finalizers"), DEMO_FINALIZER_VERBS),
    ]
}

/// ClusterRole granting the controller everything it needs.
pub fn cluster_role(name: &str) -> ClusterRole {
    ClusterRole {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        rules: Some(demo_policy_rules()),
        ..Default::default()
    }
}
