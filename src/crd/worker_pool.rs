//! WorkerPool Custom Resource Definition.
//!
//! A WorkerPool runs a fixed number of identical worker pods from one image.
//! Changes to WorkerPools are checked by the validating admission webhook.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annotation marking a WorkerPool as protected from deletion
pub const PROTECTED_ANNOTATION: &str = "workers.example.com/protected";

/// WorkerPool is a custom resource for running a pool of workers.
///
/// Example:
/// ```yaml
/// apiVersion: workers.example.com/v1alpha1
/// kind: WorkerPool
/// metadata:
///   name: batch
///   annotations:
///     workers.example.com/protected: "true"
/// spec:
///   replicas: 3
///   image:
///     repository: ghcr.io/example/worker
///     tag: "1.4.2"
/// ```
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "workers.example.com",
    version = "v1alpha1",
    kind = "WorkerPool",
    plural = "workerpools",
    shortname = "wp",
    status = "WorkerPoolStatus",
    namespaced,
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Ready", "type":"integer", "jsonPath":".status.readyReplicas"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPoolSpec {
    /// Number of worker pods (default 1).
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Worker container image.
    #[serde(default)]
    pub image: ImageSpec,

    /// Additional labels to apply to worker pods.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Default for WorkerPoolSpec {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
            image: ImageSpec::default(),
            labels: BTreeMap::new(),
        }
    }
}

fn default_replicas() -> i32 {
    1
}

/// Container image specification.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    /// Image repository.
    #[serde(default)]
    pub repository: String,

    /// Image tag (default: latest).
    #[serde(default = "default_image_tag")]
    pub tag: String,

    /// Image pull policy (default: IfNotPresent).
    #[serde(default = "default_image_pull_policy")]
    pub pull_policy: String,
}

impl Default for ImageSpec {
    fn default() -> Self {
        Self {
            repository: String::new(),
            tag: default_image_tag(),
            pull_policy: default_image_pull_policy(),
        }
    }
}

impl ImageSpec {
    /// Full image reference (`repository:tag`)
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

fn default_image_tag() -> String {
    "latest".to_string()
}

fn default_image_pull_policy() -> String {
    "IfNotPresent".to_string()
}

/// Observed state of a WorkerPool.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPoolStatus {
    /// Number of ready worker pods.
    #[serde(default)]
    pub ready_replicas: i32,
}

impl WorkerPool {
    /// Empty instance used as the decode target for admission requests
    pub fn empty() -> Self {
        WorkerPool::new("", WorkerPoolSpec::default())
    }
}
