use crate::k8s::types::{test_pod_manifest, test_pod_name, LaunchedPod};
use crate::{BackendError, Result};
use async_trait::async_trait;
use chrono::Utc;
use k8s_openapi::api::core::v1::Pod;
use kube::api::PostParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self) -> Result<Config>;
}

pub struct InClusterCredentials;

#[async_trait]
impl CredentialProvider for InClusterCredentials {
    fn name(&self) -> &'static str {
        "in-cluster"
    }

    async fn load(&self) -> Result<Config> {
        Config::incluster().map_err(|e| BackendError::KubernetesUnavailable(e.to_string()))
    }
}

/// Without a path this honours `KUBECONFIG`, then `~/.kube/config`
#[derive(Default)]
pub struct KubeconfigCredentials {
    path: Option<PathBuf>,
}

impl KubeconfigCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for KubeconfigCredentials {
    fn name(&self) -> &'static str {
        "kubeconfig"
    }

    async fn load(&self) -> Result<Config> {
        let options = KubeConfigOptions::default();
        let loaded = match &self.path {
            Some(path) => match Kubeconfig::read_from(path) {
                Ok(kubeconfig) => Config::from_custom_kubeconfig(kubeconfig, &options).await,
                Err(e) => Err(e),
            },
            None => Config::from_kubeconfig(&options).await,
        };

        loaded.map_err(|e| BackendError::KubernetesUnavailable(e.to_string()))
    }
}

pub fn default_providers() -> Vec<Box<dyn CredentialProvider>> {
    vec![
        Box::new(InClusterCredentials),
        Box::new(KubeconfigCredentials::new()),
    ]
}

/// First provider that yields a config wins
pub async fn resolve_config(providers: &[Box<dyn CredentialProvider>]) -> Result<Config> {
    let mut failures = Vec::with_capacity(providers.len());

    for provider in providers {
        match provider.load().await {
            Ok(config) => {
                debug!("Using {} Kubernetes credentials", provider.name());
                return Ok(config);
            }
            Err(e) => {
                debug!("{} credentials unavailable: {}", provider.name(), e);
                failures.push(format!("{}: {}", provider.name(), e));
            }
        }
    }

    Err(BackendError::KubernetesUnavailable(if failures.is_empty() {
        "no credential providers configured".to_string()
    } else {
        failures.join("; ")
    }))
}

pub fn classify_create_error(err: kube::Error, namespace: &str) -> BackendError {
    match err {
        kube::Error::Api(response) if response.code == 403 => BackendError::KubernetesForbidden {
            namespace: namespace.to_string(),
        },
        kube::Error::Api(response) => BackendError::KubernetesApiError {
            reason: response.reason,
            body: response.message,
        },
        other => BackendError::KubernetesError(other.to_string()),
    }
}

pub struct K8sClient {
    client: Client,
}

impl K8sClient {
    pub async fn from_providers(providers: &[Box<dyn CredentialProvider>]) -> Result<Self> {
        debug!("Initializing Kubernetes client");

        let config = resolve_config(providers).await?;
        let client = Client::try_from(config).map_err(|e| {
            BackendError::KubernetesUnavailable(format!("Failed to create K8s client: {}", e))
        })?;

        Ok(Self { client })
    }

    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub async fn create_pod(&self, pod: &Pod, namespace: &str) -> Result<Pod> {
        self.pods(namespace)
            .create(&PostParams::default(), pod)
            .await
            .map_err(|e| classify_create_error(e, namespace))
    }
}

#[async_trait]
pub trait WorkloadLauncher: Send + Sync {
    async fn launch_test_pod(&self) -> Result<LaunchedPod>;
}

pub struct ServiceAccountLauncher {
    providers: Vec<Box<dyn CredentialProvider>>,
    namespace: String,
}

impl ServiceAccountLauncher {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>, namespace: impl Into<String>) -> Self {
        Self {
            providers,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl WorkloadLauncher for ServiceAccountLauncher {
    async fn launch_test_pod(&self) -> Result<LaunchedPod> {
        let client = K8sClient::from_providers(&self.providers).await?;

        let name = test_pod_name(Utc::now().timestamp());
        let manifest = test_pod_manifest(&name, &self.namespace);

        match client.create_pod(&manifest, &self.namespace).await {
            Ok(pod) => {
                info!("Created pod {}/{}", self.namespace, name);
                Ok(LaunchedPod::from_k8s_pod(&pod, &name, &self.namespace))
            }
            Err(e) => {
                error!("Failed to create pod {}/{}: {}", self.namespace, name, e);
                Err(e)
            }
        }
    }
}
