//! SQLite-backed slot storage (durable across restarts).

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::{SessionStorage, StorageError};

/// SQLite-backed storage holding one row per slot key.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session directory at {:?}", parent))?;
        }
        Self::connect(&format!("sqlite://{}", path.to_string_lossy())).await
    }

    /// Private in-memory database, gone when the storage is dropped.
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid SQLite URL {url:?}"))?
            .create_if_missing(true);

        // A single long-lived connection: one slot, serialized writes, and an
        // in-memory database that is not discarded with an idle connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite session storage at {url:?}"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_slots (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_slots table")?;

        Ok(Self { pool })
    }

    async fn read_slot(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_slots
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch session slot")?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn write_slot(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("failed to upsert session slot")?;

        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM kv_slots
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await
        .context("failed to delete session slot")?;

        Ok(())
    }
}

fn backend(err: anyhow::Error) -> StorageError {
    StorageError::Backend(format!("{err:#}"))
}

#[async_trait]
impl SessionStorage for SqliteStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.read_slot(key).await.map_err(backend)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_slot(key, value).await.map_err(backend)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_slot(key).await.map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_overwrites_slot() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage.write("currentUser", "first").await.unwrap();
        storage.write("currentUser", "second").await.unwrap();
        assert_eq!(storage.read("currentUser").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage.write("currentUser", "x").await.unwrap();
        storage.remove("currentUser").await.unwrap();
        storage.remove("currentUser").await.unwrap();
        assert_eq!(storage.read("currentUser").await.unwrap(), None);
    }

    #[tokio::test]
    async fn slots_survive_reopening_the_file() {
        let dir = std::env::temp_dir().join(format!("traveldesk-sqlite-{}", std::process::id()));
        let path = dir.join("session.db");
        let _ = std::fs::remove_file(&path);

        {
            let storage = SqliteStorage::open(&path).await.unwrap();
            storage.write("currentUser", "{\"id\":\"u-1\"}").await.unwrap();
            storage.pool.close().await;
        }

        let reopened = SqliteStorage::open(&path).await.unwrap();
        assert_eq!(
            reopened.read("currentUser").await.unwrap().as_deref(),
            Some("{\"id\":\"u-1\"}")
        );
        reopened.pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
