use k8s_openapi::api::core::v1::{Container, Pod, PodSpec, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TEST_POD_PREFIX: &str = "test-pod";
pub const TEST_CONTAINER_NAME: &str = "test-container";
pub const TEST_CONTAINER_IMAGE: &str = "busybox:latest";

/// A pod created through the service account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchedPod {
    pub name: String,
    pub namespace: String,
    pub uid: String,
}

impl LaunchedPod {
    pub fn from_k8s_pod(pod: &Pod, requested_name: &str, namespace: &str) -> Self {
        let metadata = &pod.metadata;

        Self {
            name: metadata
                .name
                .clone()
                .unwrap_or_else(|| requested_name.to_string()),
            namespace: metadata
                .namespace
                .clone()
                .unwrap_or_else(|| namespace.to_string()),
            uid: metadata.uid.clone().unwrap_or_default(),
        }
    }
}

pub fn test_pod_name(unix_seconds: i64) -> String {
    format!("{}-{}", TEST_POD_PREFIX, unix_seconds)
}

fn quantities(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.to_string())),
        ("memory".to_string(), Quantity(memory.to_string())),
    ])
}

/// Short-lived busybox pod used to check the service account can create pods
pub fn test_pod_manifest(name: &str, namespace: &str) -> Pod {
    let labels = BTreeMap::from([
        ("app".to_string(), TEST_POD_PREFIX.to_string()),
        ("created-by".to_string(), "backend-api".to_string()),
    ]);

    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: TEST_CONTAINER_NAME.to_string(),
                image: Some(TEST_CONTAINER_IMAGE.to_string()),
                command: Some(vec!["sleep".to_string(), "3600".to_string()]),
                resources: Some(ResourceRequirements {
                    requests: Some(quantities("50m", "64Mi")),
                    limits: Some(quantities("100m", "128Mi")),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            restart_policy: Some("Never".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
