pub mod postgres;

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;

pub use postgres::{ColumnInfo, DatabaseSettings, PgItemStore, TableReport};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Item {
    pub id: i32,
    pub title: String,
    #[serde(serialize_with = "serialize_created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

fn serialize_created_at<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        None => serializer.serialize_str(""),
    }
}

/// Storage contract for items
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn ensure_schema(&self) -> Result<()>;

    async fn ping(&self) -> Result<()>;

    /// All items, newest first
    async fn list(&self) -> Result<Vec<Item>>;

    async fn get(&self, id: i32) -> Result<Option<Item>>;

    async fn insert(&self, title: &str) -> Result<Item>;

    async fn update(&self, id: i32, title: &str) -> Result<Option<Item>>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: i32) -> Result<bool>;
}
