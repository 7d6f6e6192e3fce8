//! HTTP surface of the backend
//!
//! - `GET /health`, `GET /ready` - Kubernetes probes
//! - `GET /metrics` - Prometheus exposition
//! - `GET /version`, `GET /api/env` - diagnostics
//! - `/api/items` - CRUD over the items table
//! - `GET|POST /api/error` - always 500
//! - `POST /api/test-pod` - service account check

pub mod error;
pub mod extract;
pub mod items;
pub mod pods;
pub mod system;

use crate::k8s::WorkloadLauncher;
use crate::metrics::{track_http_metrics, HttpMetrics};
use crate::store::ItemStore;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Name and version reported by `/version` and the probes
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

/// Shared application state
pub struct AppState {
    pub info: AppInfo,
    pub store: Arc<dyn ItemStore>,
    pub launcher: Arc<dyn WorkloadLauncher>,
    pub metrics: HttpMetrics,
}

impl AppState {
    pub fn new(
        info: AppInfo,
        store: Arc<dyn ItemStore>,
        launcher: Arc<dyn WorkloadLauncher>,
        metrics: HttpMetrics,
    ) -> Self {
        Self {
            info,
            store,
            launcher,
            metrics,
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the router with all endpoints and the middleware stack
pub fn build_router(state: Arc<AppState>) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route("/health", get(system::health))
        .route("/ready", get(system::ready))
        .route("/metrics", get(system::metrics))
        .route("/version", get(system::version))
        .route("/api/env", get(system::environment))
        .route("/api/items", get(items::list_items).post(items::create_item))
        .route(
            "/api/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/api/error",
            get(system::trigger_error).post(system::trigger_error),
        )
        .route("/api/test-pod", post(pods::create_test_pod))
        .with_state(state)
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(metrics, track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}
