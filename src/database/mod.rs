// ABOUTME: SQLite connection management and schema creation for the recipe sharing server
// ABOUTME: Hands out per-domain managers (users, catalog, recipes, collections, follows) over one pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! # Database Management
//!
//! This module owns the `SQLite` pool and the schema. Each domain gets a
//! small manager wrapping a clone of the pool; the managers never open
//! their own connections.

/// Tag and ingredient catalog
pub mod catalog;
/// Favorites and shopping cart memberships
pub mod collections;
/// User subscriptions
pub mod follows;
/// Recipes with their tags and ingredient amounts
pub mod recipes;
/// User accounts
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::fs;
use tracing::{debug, info};

pub use catalog::CatalogManager;
pub use collections::CollectionsManager;
pub use follows::FollowsManager;
pub use recipes::{RecipeDraft, RecipeFilter, RecipeWriter, RecipesManager};
pub use users::UsersManager;

use crate::errors::{AppError, AppResult};

/// Maximum pooled connections for file-backed databases
const MAX_FILE_CONNECTIONS: u32 = 8;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database handle shared by every request
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and create the schema
    ///
    /// In-memory databases are served by exactly one connection that is
    /// never reaped, so every request sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database file cannot be
    /// created, or schema creation fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = is_in_memory(database_url);
        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL {database_url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::config(format!(
                            "Cannot create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        info!(in_memory, "Database ready");
        Ok(database)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to confirm the pool can serve requests
    ///
    /// # Errors
    ///
    /// Returns a database error if no connection can run the query
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// User account operations
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Tag and ingredient operations
    #[must_use]
    pub fn catalog(&self) -> CatalogManager {
        CatalogManager::new(self.pool.clone())
    }

    /// Recipe read operations
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Favorites and shopping cart operations
    #[must_use]
    pub fn collections(&self) -> CollectionsManager {
        CollectionsManager::new(self.pool.clone())
    }

    /// Subscription operations
    #[must_use]
    pub fn follows(&self) -> FollowsManager {
        FollowsManager::new(self.pool.clone())
    }

    /// Create every table and index that does not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_catalog().await?;
        self.migrate_recipes().await?;
        self.migrate_collections().await?;
        self.migrate_follows().await?;
        debug!("Schema up to date");
        Ok(())
    }

    /// Run a list of DDL statements in order
    async fn execute_ddl(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Schema migration failed: {e}")))?;
        }
        Ok(())
    }
}

/// Whether the URL names an in-memory database
fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:recipes?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:./data/recipes.db"));
    }
}
