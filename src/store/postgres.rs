use crate::store::{Item, ItemStore};
use crate::{BackendError, Result};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, FromRow, PgConnection};
use tracing::{debug, info, warn};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        created_at TIMESTAMPTZ DEFAULT NOW()
    )
"#;

const TABLE_EXISTS: &str = r#"
    SELECT EXISTS (
        SELECT FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_name = 'items'
    )
"#;

const TABLE_COLUMNS: &str = r#"
    SELECT column_name::text AS column_name,
           data_type::text AS data_type,
           is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_name = 'items'
    ORDER BY ordinal_position
"#;

/// Connection parameters for the PostgreSQL server
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

/// One row of `information_schema.columns` for the items table
#[derive(Debug, Clone, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
}

impl ColumnInfo {
    pub fn nullability(&self) -> &'static str {
        if self.is_nullable == "YES" {
            "NULL"
        } else {
            "NOT NULL"
        }
    }
}

/// Result of inspecting the items table after initialisation
#[derive(Debug, Clone)]
pub struct TableReport {
    pub exists: bool,
    pub columns: Vec<ColumnInfo>,
    pub row_count: i64,
}

/// [`ItemStore`] backed by PostgreSQL, one connection per call
pub struct PgItemStore {
    settings: DatabaseSettings,
    options: PgConnectOptions,
}

impl PgItemStore {
    pub fn new(settings: DatabaseSettings) -> Self {
        let options = settings.connect_options();
        Self { settings, options }
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    async fn connect(&self) -> Result<PgConnection> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                warn!(
                    host = %self.settings.host,
                    port = self.settings.port,
                    error = %e,
                    "Database connection failed"
                );
                BackendError::DatabaseUnavailable(e.to_string())
            })
    }

    /// Create the table, then report what the server actually has
    pub async fn initialize_and_inspect(&self) -> Result<TableReport> {
        let mut conn = self.connect().await?;
        let report = inspect(&mut conn).await;
        release(conn).await;
        report
    }
}

async fn inspect(conn: &mut PgConnection) -> Result<TableReport> {
    sqlx::query(CREATE_TABLE).execute(&mut *conn).await?;

    let exists = sqlx::query_scalar::<_, bool>(TABLE_EXISTS)
        .fetch_one(&mut *conn)
        .await?;
    if !exists {
        return Ok(TableReport {
            exists,
            columns: Vec::new(),
            row_count: 0,
        });
    }

    let columns = sqlx::query_as::<_, ColumnInfo>(TABLE_COLUMNS)
        .fetch_all(&mut *conn)
        .await?;
    let row_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
        .fetch_one(&mut *conn)
        .await?;

    Ok(TableReport {
        exists,
        columns,
        row_count,
    })
}

async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "Error while closing database connection");
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(CREATE_TABLE).execute(&mut conn).await;
        release(conn).await;
        result?;

        info!("Table 'items' initialized");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1").execute(&mut conn).await;
        release(conn).await;
        result?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, Item>(
            "SELECT id, title, created_at FROM items ORDER BY created_at DESC",
        )
        .fetch_all(&mut conn)
        .await;
        release(conn).await;
        Ok(result?)
    }

    async fn get(&self, id: i32) -> Result<Option<Item>> {
        let mut conn = self.connect().await?;
        let result =
            sqlx::query_as::<_, Item>("SELECT id, title, created_at FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut conn)
                .await;
        release(conn).await;
        Ok(result?)
    }

    async fn insert(&self, title: &str) -> Result<Item> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, Item>(
            "INSERT INTO items (title) VALUES ($1) RETURNING id, title, created_at",
        )
        .bind(title)
        .fetch_one(&mut conn)
        .await;
        release(conn).await;
        Ok(result?)
    }

    async fn update(&self, id: i32, title: &str) -> Result<Option<Item>> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, Item>(
            "UPDATE items SET title = $1 WHERE id = $2 RETURNING id, title, created_at",
        )
        .bind(title)
        .bind(id)
        .fetch_optional(&mut conn)
        .await;
        release(conn).await;
        Ok(result?)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut conn)
            .await;
        release(conn).await;
        Ok(result?.rows_affected() > 0)
    }
}
