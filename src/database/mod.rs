// ABOUTME: SQLite connection management and schema migration for the food table
// ABOUTME: Read-write opening for imports, read-only opening for lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! The engine reads a single `foods` table. Importers open it read-write
//! through [`Database::new`], which creates the file and schema as needed;
//! request handling opens it through [`Database::open_read_only`].

/// Food table queries
pub mod foods;
/// Food resolution seam used by the service layer
pub mod lookup;

pub use foods::FoodRepository;
pub use lookup::{FoodLookup, InMemoryFoodLookup, SqliteFoodLookup};

use std::path::PathBuf;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Connection pool for the food table
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open a database read-write, creating it and running migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// connection fails, or a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        if let Some(parent) = sqlite_file_path(database_url)
            .as_ref()
            .and_then(|path| path.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }

        let pool = connect(&with_mode(database_url, "rwc")).await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open an existing database for lookups only
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file does not exist or cannot be opened
    pub async fn open_read_only(database_url: &str) -> AppResult<Self> {
        let pool = connect(&with_mode(database_url, "ro")).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Repository over the `foods` table
    #[must_use]
    pub fn foods(&self) -> FoodRepository {
        FoodRepository::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS foods (
                food_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                source TEXT NOT NULL,
                common_name TEXT,
                category TEXT,
                brand TEXT,
                nutrition_100g TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create foods table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_foods_name ON foods (name COLLATE NOCASE)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create foods index: {e}")))?;

        debug!("Food table migrations applied");
        Ok(())
    }
}

async fn connect(url: &str) -> AppResult<Pool<Sqlite>> {
    // Each in-memory connection is its own database, so keep exactly one
    let max_connections = if is_memory_url(url) { 1 } else { 4 };
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to open food database '{url}': {e}")).with_source(e)
        })
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Add a `mode=` parameter to a `SQLite` URL unless it already has one
fn with_mode(database_url: &str, mode: &str) -> String {
    if !database_url.starts_with("sqlite:") || is_memory_url(database_url) {
        return database_url.to_owned();
    }
    if database_url.contains("mode=") {
        return database_url.to_owned();
    }
    let separator = if database_url.contains('?') { '&' } else { '?' };
    format!("{database_url}{separator}mode={mode}")
}

/// File path of a file-backed `SQLite` URL
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) {
        return None;
    }
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty()).then(|| PathBuf::from(path))
}
