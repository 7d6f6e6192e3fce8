#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tpk_backend::api::{build_router, AppInfo, AppState};
use tpk_backend::k8s::{LaunchedPod, WorkloadLauncher};
use tpk_backend::metrics::HttpMetrics;
use tpk_backend::store::{Item, ItemStore};
use tpk_backend::{BackendError, Result};

/// In-memory [`ItemStore`] with switches to simulate outages
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<Item>>,
    next_id: Mutex<i32>,
    down: AtomicBool,
    broken: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connections fail, like an unreachable server
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Connections succeed but every statement fails
    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(BackendError::DatabaseUnavailable(
                "connection refused".to_string(),
            ));
        }
        if self.broken.load(Ordering::SeqCst) {
            return Err(BackendError::DatabaseError(
                "relation \"items\" does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn timestamp(id: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(id as i64)
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        self.check()
    }

    async fn ping(&self) -> Result<()> {
        self.check()
    }

    async fn list(&self) -> Result<Vec<Item>> {
        self.check()?;
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn get(&self, id: i32) -> Result<Option<Item>> {
        self.check()?;
        let items = self.items.lock().unwrap();
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn insert(&self, title: &str) -> Result<Item> {
        self.check()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let item = Item {
            id: *next_id,
            title: title.to_string(),
            created_at: Some(Self::timestamp(*next_id)),
        };
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: i32, title: &str) -> Result<Option<Item>> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        Ok(items.iter_mut().find(|item| item.id == id).map(|item| {
            item.title = title.to_string();
            item.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }
}

/// Scripted [`WorkloadLauncher`] outcomes
pub enum FakeLauncher {
    Succeeds,
    NoCredentials,
    Forbidden,
    ApiFailure,
}

#[async_trait]
impl WorkloadLauncher for FakeLauncher {
    async fn launch_test_pod(&self) -> Result<LaunchedPod> {
        match self {
            FakeLauncher::Succeeds => Ok(LaunchedPod {
                name: "test-pod-1700000000".to_string(),
                namespace: "todolist".to_string(),
                uid: "0b4f6c1e-uid".to_string(),
            }),
            FakeLauncher::NoCredentials => Err(BackendError::KubernetesUnavailable(
                "in-cluster: missing token; kubeconfig: not found".to_string(),
            )),
            FakeLauncher::Forbidden => Err(BackendError::KubernetesForbidden {
                namespace: "todolist".to_string(),
            }),
            FakeLauncher::ApiFailure => Err(BackendError::KubernetesApiError {
                reason: "Invalid".to_string(),
                body: "metadata.name: Invalid value".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub metrics: HttpMetrics,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_launcher(FakeLauncher::Succeeds)
    }

    pub fn with_launcher(launcher: FakeLauncher) -> Self {
        let store = Arc::new(MemoryStore::new());
        let metrics = HttpMetrics::new().unwrap();
        let info = AppInfo {
            name: "tp-kubernetes-backend".to_string(),
            version: "1.0.0".to_string(),
        };

        let state = Arc::new(AppState::new(
            info,
            store.clone(),
            Arc::new(launcher),
            metrics.clone(),
        ));

        Self {
            router: build_router(state),
            store,
            metrics,
        }
    }

    pub async fn raw(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, content_type, bytes.to_vec())
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, bytes) = self.raw(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
