//! SQLite coordinate store
//!
//! One row per system in the `systems` table. The file is opened in WAL mode so
//! concurrent requests can read while another writes, and every write is a
//! single upsert statement so readers never observe a half-written row.

use crate::error::{CacheError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::path::Path;
use std::time::Duration;
use wizard_core_starmap::{CachedSystem, Coordinates, SystemId};

/// Persistent mapping from system identifier to cached coordinates
#[async_trait]
pub trait SystemStore: Send + Sync {
    /// Look up a cached system. Never writes.
    async fn get(&self, system_id: SystemId) -> Result<Option<CachedSystem>>;

    /// Insert or refresh a system.
    ///
    /// `added` is set on first insert only; `last_update` is set on every call.
    async fn put(&self, system_id: SystemId, name: &str, position: Coordinates) -> Result<()>;

    /// Number of cached systems
    async fn count(&self) -> Result<u64>;
}

/// SQLite-backed system store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create the database file at `path` and ensure the schema exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CacheError::storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        tracing::info!(path = %path.display(), "System cache opened");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS systems (
                system_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                x REAL NOT NULL,
                y REAL NOT NULL,
                z REAL NOT NULL,
                added TEXT NOT NULL,
                last_update TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the underlying pool (for administrative access)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_cached_system(row: &SqliteRow) -> Result<CachedSystem> {
    let raw_id: i64 = row.try_get("system_id")?;
    let system_id = SystemId::new(raw_id)
        .map_err(|_| CacheError::storage(format!("Corrupt row: system_id {} out of range", raw_id)))?;

    Ok(CachedSystem {
        system_id,
        name: row.try_get("name")?,
        position: Coordinates::new(row.try_get("x")?, row.try_get("y")?, row.try_get("z")?),
        added: row.try_get::<DateTime<Utc>, _>("added")?,
        last_update: row.try_get::<DateTime<Utc>, _>("last_update")?,
    })
}

#[async_trait]
impl SystemStore for SqliteStore {
    async fn get(&self, system_id: SystemId) -> Result<Option<CachedSystem>> {
        let row = sqlx::query(
            "SELECT system_id, name, x, y, z, added, last_update
             FROM systems
             WHERE system_id = ?",
        )
        .bind(system_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_cached_system).transpose()
    }

    async fn put(&self, system_id: SystemId, name: &str, position: Coordinates) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO systems (system_id, name, x, y, z, added, last_update)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (system_id) DO UPDATE SET
                 name = excluded.name,
                 x = excluded.x,
                 y = excluded.y,
                 z = excluded.z,
                 last_update = excluded.last_update",
        )
        .bind(system_id.get())
        .bind(name)
        .bind(position.x)
        .bind(position.y)
        .bind(position.z)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(system_id = %system_id, name, "Upserted system");
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM systems")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}
