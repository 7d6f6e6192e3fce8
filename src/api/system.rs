//! Probes, metrics exposition and diagnostic endpoints

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::metrics::PrometheusExporter;
use crate::BackendError;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, warn};

/// Environment keys containing any of these (case-insensitive) are masked
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "USER",
    "PASSWORD",
    "SECRET",
    "KEY",
    "TOKEN",
    "CREDENTIAL",
    "AUTH",
    "SHA256",
    "HASH",
];

pub const MASK: &str = "***";

const INTENTIONAL_ERROR: &str = "Intentional 500 error for monitoring tests";

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub app_name: String,
    pub version: String,
}

/// Liveness probe, never touches the database
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: "healthy",
        service: state.info.name.clone(),
    })
}

/// Readiness probe, 503 while the database cannot answer `SELECT 1`
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<Json<ProbeResponse>, ApiError> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(ProbeResponse {
            status: "ready",
            service: state.info.name.clone(),
        })),
        Err(BackendError::DatabaseUnavailable(_)) => Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database not available",
        )),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            Err(ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Database check failed: {}", e),
            ))
        }
    }
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match PrometheusExporter::new(&state.metrics).format_current_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, PrometheusExporter::content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn version(State(state): State<Arc<AppState>>) -> Json<VersionResponse> {
    Json(VersionResponse {
        app_name: state.info.name.clone(),
        version: state.info.version.clone(),
    })
}

pub fn is_sensitive(key: &str) -> bool {
    let key = key.to_uppercase();
    SENSITIVE_KEYWORDS.iter().any(|keyword| key.contains(keyword))
}

/// Copy of the given variables with sensitive values replaced by [`MASK`]
pub fn mask_environment<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .map(|(key, value)| {
            if is_sensitive(&key) {
                (key, MASK.to_string())
            } else {
                (key, value)
            }
        })
        .collect()
}

pub async fn environment() -> Json<BTreeMap<String, String>> {
    let vars = std::env::vars_os().map(|(key, value)| {
        (
            key.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    });
    Json(mask_environment(vars))
}

/// Always fails, used to exercise 5xx alerting
pub async fn trigger_error() -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTENTIONAL_ERROR)
}
