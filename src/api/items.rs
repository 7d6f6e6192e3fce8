//! CRUD handlers for `/api/items`

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::store::Item;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// Body of create and update requests
#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub title: String,
}

impl ItemPayload {
    fn validated_title(&self) -> Result<&str, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::unprocessable("title must not be empty"));
        }
        Ok(&self.title)
    }
}

pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from_store(e, "Error fetching items"))?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Item>, ApiError> {
    state
        .store
        .get(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Error fetching item"))?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ItemPayload>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let title = payload.validated_title()?;

    let item = state
        .store
        .insert(title)
        .await
        .map_err(|e| ApiError::from_store(e, "Error creating item"))?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ItemPayload>,
) -> Result<Json<Item>, ApiError> {
    let title = payload.validated_title()?;

    state
        .store
        .update(id, title)
        .await
        .map_err(|e| ApiError::from_store(e, "Error updating item"))?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Error deleting item"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found())
    }
}
