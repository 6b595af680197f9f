//! PostgreSQL table adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use payments_types::RepoError;

use crate::table::{Item, KeyValueStore, TableKey, item_from_json, item_to_json};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Table
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value table stored in PostgreSQL.
pub struct PostgresTable {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresTable {
    /// Connects and creates the table if needed.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_items.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for PostgresTable {
    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, RepoError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT item FROM payment_platform WHERE pk = $1 AND sk = $2"#)
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
            r#"INSERT INTO payment_platform (pk, sk, item) VALUES ($1, $2, $3)
               ON CONFLICT (pk, sk) DO UPDATE SET item = EXCLUDED.item"#,
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
