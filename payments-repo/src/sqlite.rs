//! SQLite table adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use payments_types::RepoError;

use crate::table::{Item, KeyValueStore, TableKey, item_from_json, item_to_json};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Table
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value table stored in SQLite.
///
/// Each row holds one item as its JSON attribute map.
pub struct SqliteTable {
    pool: SqlitePool,
}

impl SqliteTable {
    /// Opens the database and creates the table if needed.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database is a separate database, and
        // the database is dropped with its last connection: keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_items.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteTable {
    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, RepoError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT item FROM payment_platform WHERE pk = ? AND sk = ?"#)
                .bind(&key.pk)
                .bind(&key.sk)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(|(json,)| item_from_json(&json)).transpose()
    }

    async fn put_item(&self, item: Item) -> Result<(), RepoError> {
        let key = TableKey::of_item(&item)?;
        let json = item_to_json(&item)?;

        sqlx::query(
            r#"INSERT INTO payment_platform (pk, sk, item) VALUES (?, ?, ?)
               ON CONFLICT (pk, sk) DO UPDATE SET item = excluded.item"#,
        )
        .bind(&key.pk)
        .bind(&key.sk)
        .bind(&json)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}
