//! Resource type registry
//!
//! A [`Scheme`] records which custom resource kinds a process knows about,
//! keyed by group/version/kind. It is populated explicitly at startup and is
//! the single source for CRD rendering.

use crate::error::CrdError;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{CustomResourceExt, Resource};
use std::collections::BTreeMap;

/// Identity of a registered resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// API group, e.g. `apps.my.domain`
    pub group: String,
    /// API version within the group
    pub version: String,
    /// Kind of a single object
    pub kind: String,
    /// Kind of the list wrapper (`<Kind>List`)
    pub list_kind: String,
    /// Plural resource name used in URLs
    pub plural: String,
    /// Whether objects live in a namespace
    pub namespaced: bool,
}

impl Registration {
    /// `group/version`, as used in `apiVersion`
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    fn key(&self) -> String {
        format!("{}/{}", self.api_version(), self.kind)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    registration: Registration,
    crd: CustomResourceDefinition,
}

/// Registry of custom resource kinds known to this process
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    entries: BTreeMap<String, Entry>,
}

impl Scheme {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `K` and its list kind.
    ///
    /// Registering the same group/version/kind twice is an error.
    pub fn register<K>(&mut self) -> Result<&Registration, CrdError>
    where
        K: Resource<DynamicType = ()> + CustomResourceExt,
    {
        let crd = K::crd();
        let kind = K::kind(&()).into_owned();
        let list_kind = crd
            .spec
            .names
            .list_kind
            .clone()
            .unwrap_or_else(|| format!("{kind}List"));

        let registration = Registration {
            group: K::group(&()).into_owned(),
            version: K::version(&()).into_owned(),
            kind,
            list_kind,
            plural: K::plural(&()).into_owned(),
            namespaced: crd.spec.scope == "Namespaced",
        };

        let key = registration.key();
        if self.entries.contains_key(&key) {
            return Err(CrdError::AlreadyRegistered(key));
        }

        let entry = self
            .entries
            .entry(key)
            .or_insert(Entry { registration, crd });
        Ok(&entry.registration)
    }

    /// Whether `K` has been registered.
    pub fn is_registered<K>(&self) -> bool
    where
        K: Resource<DynamicType = ()>,
    {
        let key = format!("{}/{}", K::api_version(&()), K::kind(&()));
        self.entries.contains_key(&key)
    }

    /// Looks up a registration by `apiVersion` and kind (or list kind).
    pub fn lookup(&self, api_version: &str, kind: &str) -> Option<&Registration> {
        self.entries
            .values()
            .map(|e| &e.registration)
            .find(|r| r.api_version() == api_version && (r.kind == kind || r.list_kind == kind))
    }

    /// All registrations, ordered by group/version/kind.
    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.entries.values().map(|e| &e.registration)
    }

    /// CRD documents of all registered kinds.
    pub fn crds(&self) -> impl Iterator<Item = &CustomResourceDefinition> {
        self.entries.values().map(|e| &e.crd)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders every registered CRD as a multi-document YAML stream.
    pub fn to_yaml(&self) -> Result<String, CrdError> {
        let docs = self
            .crds()
            .map(serde_yaml::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs.join("---\n"))
    }
}
