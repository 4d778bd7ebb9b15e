//! SQLite-backed text store.
//!
//! # Responsibilities
//! - Own the connection pool and the `texts` schema
//! - Append records, stream them back in insertion order, bulk clear
//!
//! # Design Decisions
//! - `AUTOINCREMENT` ids so an id is never handed out twice, even after clear
//! - In-memory databases are pinned to one long-lived connection, since each
//!   SQLite connection would otherwise see its own empty database

use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::observability::metrics;
use crate::storage::record::TextRecord;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS texts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    some_text TEXT NOT NULL
)
"#;

/// Errors surfaced by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database cannot be reached (pool closed, I/O failure, timeout).
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The database answered but the statement failed.
    #[error("storage query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::Io(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
            _ => StoreError::Query(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only store of [`TextRecord`]s.
#[derive(Debug, Clone)]
pub struct TextStore {
    pool: SqlitePool,
}

impl TextStore {
    /// Open the configured database and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = if is_memory_url(&config.url) {
            single_connection()
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };
        let pool = options.connect(&config.url).await?;
        let store = Self::from_pool(pool).await?;
        tracing::info!(url = %config.url, "Text store ready");
        Ok(store)
    }

    /// Fresh private in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = single_connection().connect("sqlite::memory:").await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(SCHEMA_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Store `content` (truncated to 100 characters) and return its new id.
    pub async fn insert(&self, content: &str) -> StoreResult<i64> {
        let record = TextRecord::new(content);
        let id = sqlx::query("INSERT INTO texts (some_text) VALUES (?)")
            .bind(&record.some_text)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        metrics::record_inserts(1);
        tracing::debug!(id, chars = record.some_text.chars().count(), "Inserted text record");
        Ok(id)
    }

    /// Every record, oldest first. Each call starts a new query.
    pub fn list_all(&self) -> BoxStream<'_, StoreResult<TextRecord>> {
        sqlx::query_as::<_, TextRecord>("SELECT id, some_text FROM texts ORDER BY id")
            .fetch(&self.pool)
            .map_err(StoreError::from)
            .boxed()
    }

    /// Delete every record. Returns how many were removed.
    pub async fn clear(&self) -> StoreResult<u64> {
        let removed = sqlx::query("DELETE FROM texts")
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::info!(removed, "Cleared text store");
        Ok(removed)
    }

    /// Insert `count` records of random text, one after another.
    pub async fn fill_with_samples(&self, count: usize) -> StoreResult<()> {
        for _ in 0..count {
            self.insert(&Uuid::new_v4().to_string()).await?;
        }
        tracing::info!(count, "Filled text store with samples");
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM texts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool; later calls fail with [`StoreError::Unavailable`].
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn single_connection() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}
