use crate::BackendError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Error body returned by every endpoint: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Item not found")
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    /// Map a store failure, prefixing query errors with what was attempted
    pub fn from_store(err: BackendError, action: &str) -> Self {
        match err {
            BackendError::DatabaseUnavailable(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Database not available")
            }
            other => {
                error!(error = %other, "{} failed", action);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}: {}", action, other),
                )
            }
        }
    }

    /// Map a pod creation failure
    pub fn from_orchestrator(err: BackendError) -> Self {
        match err {
            BackendError::KubernetesUnavailable(_) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Kubernetes client not available. Make sure the pod has proper ServiceAccount permissions.",
            ),
            BackendError::KubernetesForbidden { namespace } => Self::new(
                StatusCode::FORBIDDEN,
                format!(
                    "Permission denied. ServiceAccount needs 'pods/create' permission in namespace '{}'. Check Role and RoleBinding.",
                    namespace
                ),
            ),
            err @ BackendError::KubernetesApiError { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error creating pod: {}", err),
            ),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unexpected error: {}", other),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors() {
        let err = ApiError::from_store(
            BackendError::DatabaseUnavailable("connection refused".to_string()),
            "Error fetching items",
        );
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.detail, "Database not available");

        let err = ApiError::from_store(
            BackendError::DatabaseError("relation \"items\" does not exist".to_string()),
            "Error fetching items",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail,
            "Error fetching items: relation \"items\" does not exist"
        );
    }

    #[test]
    fn test_orchestrator_errors() {
        let err = ApiError::from_orchestrator(BackendError::KubernetesUnavailable(
            "no config".to_string(),
        ));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from_orchestrator(BackendError::KubernetesForbidden {
            namespace: "todolist".to_string(),
        });
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(err.detail.contains("'pods/create'"));
        assert!(err.detail.contains("'todolist'"));

        let err = ApiError::from_orchestrator(BackendError::KubernetesApiError {
            reason: "Invalid".to_string(),
            body: "spec.containers: Required value".to_string(),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail,
            "Error creating pod: Invalid - spec.containers: Required value"
        );

        let err =
            ApiError::from_orchestrator(BackendError::KubernetesError("timed out".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail.starts_with("Unexpected error: "));
    }
}
