pub mod client;
pub mod types;

pub use client::{
    default_providers, resolve_config, CredentialProvider, InClusterCredentials, K8sClient,
    KubeconfigCredentials, ServiceAccountLauncher, WorkloadLauncher,
};
pub use types::{test_pod_manifest, LaunchedPod};
