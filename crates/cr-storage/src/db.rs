//! SQLite backend over a page-property table

use std::path::PathBuf;

use async_trait::async_trait;
use cr_core::{RatingCode, UnitId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{PROPERTY_NAME, PageProp, RatingBackend, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS page_props (
    pp_page     INTEGER NOT NULL,
    pp_propname TEXT    NOT NULL,
    pp_value    TEXT    NOT NULL,
    PRIMARY KEY (pp_page, pp_propname)
)
"#;

/// Rating rows stored as `content-rating` properties in `page_props`
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open (or create) the database at `db_path`, defaulting to the
    /// platform data directory.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.unwrap_or_else(Self::default_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.display(), "opened rating database");
        Self::with_pool(pool).await
    }

    /// Private in-memory database, lives as long as the backend
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if needed
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn default_path() -> PathBuf {
        if let Some(dirs) =
            directories::ProjectDirs::from("org", "content-rating", "content-rating")
        {
            dirs.data_dir().join("ratings.db")
        } else {
            PathBuf::from(".content-rating/ratings.db")
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RatingBackend for SqliteBackend {
    async fn fetch(&self, unit: UnitId) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT pp_value FROM page_props WHERE pp_page = ? AND pp_propname = ?",
        )
        .bind(unit.get())
        .bind(PROPERTY_NAME)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn upsert(&self, unit: UnitId, code: &RatingCode) -> Result<()> {
        sqlx::query(
            "INSERT INTO page_props (pp_page, pp_propname, pp_value) VALUES (?, ?, ?) \
             ON CONFLICT (pp_page, pp_propname) DO UPDATE SET pp_value = excluded.pp_value",
        )
        .bind(unit.get())
        .bind(PROPERTY_NAME)
        .bind(code.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, unit: UnitId) -> Result<()> {
        sqlx::query("DELETE FROM page_props WHERE pp_page = ? AND pp_propname = ?")
            .bind(unit.get())
            .bind(PROPERTY_NAME)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PageProp>> {
        let rows = sqlx::query_as::<_, PageProp>(
            "SELECT pp_page, pp_propname, pp_value FROM page_props \
             WHERE pp_propname = ? ORDER BY pp_page",
        )
        .bind(PROPERTY_NAME)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
