use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Database not available: {0}")]
    DatabaseUnavailable(String),

    #[error("{0}")]
    DatabaseError(String),

    #[error("Kubernetes credentials not available: {0}")]
    KubernetesUnavailable(String),

    #[error("Permission denied to create pods in namespace {namespace}")]
    KubernetesForbidden { namespace: String },

    #[error("{reason} - {body}")]
    KubernetesApiError { reason: String, body: String },

    #[error("Kubernetes error: {0}")]
    KubernetesError(String),

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sqlx::Error> for BackendError {
    fn from(e: sqlx::Error) -> Self {
        BackendError::DatabaseError(e.to_string())
    }
}

impl From<prometheus::Error> for BackendError {
    fn from(e: prometheus::Error) -> Self {
        BackendError::MetricsError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
