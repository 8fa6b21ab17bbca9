// SPDX-License-Identifier: GPL-3.0

use std::{fs, path::Path, sync::Arc};

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Row, Sqlite, SqlitePool};

use crate::app::core::store::KeyValueStore;

/// [`KeyValueStore`] backed by a single SQLite table
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    /// Opens (creating it if needed) the database at `path` and runs the migrations
    pub async fn open(path: &Path) -> Result<Self, anywho::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("migrations run successfully on {}", path.display());

        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

impl KeyValueStore for SqliteStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, anywho::Error> {
        let row = sqlx::query("SELECT value FROM key_value WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), anywho::Error> {
        sqlx::query(
            "INSERT INTO key_value (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(bytes)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

/// Init the application database
pub async fn init_database(app_id: &str) -> Result<SqliteStore, anywho::Error> {
    let db_path = dirs::data_dir()
        .ok_or_else(|| anywho::anywho!("could not find the user data directory"))?
        .join(app_id)
        .join("database")
        .join("flashzilla.db");

    tracing::info!("opening database at {}", db_path.display());
    SqliteStore::open(&db_path).await
}
