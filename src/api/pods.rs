use crate::api::error::ApiError;
use crate::api::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct TestPodResponse {
    pub status: &'static str,
    pub message: String,
    pub pod_name: String,
    pub namespace: String,
    pub pod_uid: String,
}

/// Create a test pod to check the service account can create workloads
pub async fn create_test_pod(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TestPodResponse>, ApiError> {
    let pod = state
        .launcher
        .launch_test_pod()
        .await
        .map_err(ApiError::from_orchestrator)?;

    Ok(Json(TestPodResponse {
        status: "success",
        message: format!("Pod '{}' created successfully", pod.name),
        pod_name: pod.name,
        namespace: pod.namespace,
        pod_uid: pod.uid,
    }))
}
