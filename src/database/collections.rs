// ABOUTME: Favorites and shopping cart database operations sharing one (user, recipe) table shape
// ABOUTME: Also provides the single join query feeding shopping list aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::Database;
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::models::{RecipeCollection, ShoppingLine};

impl Database {
    /// Create the favorites and `shopping_cart` tables
    pub(super) async fn migrate_collections(&self) -> AppResult<()> {
        for collection in [RecipeCollection::Favorites, RecipeCollection::ShoppingCart] {
            let table = collection.table();
            let create = format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    created_at TEXT NOT NULL,
                    UNIQUE (user_id, recipe_id)
                )
                "
            );
            let index =
                format!("CREATE INDEX IF NOT EXISTS idx_{table}_recipe ON {table}(recipe_id)");
            self.execute_ddl(&[create.as_str(), index.as_str()]).await?;
        }
        Ok(())
    }
}

/// Favorites and shopping cart database operations manager
pub struct CollectionsManager {
    pool: SqlitePool,
}

impl CollectionsManager {
    /// Create a new collections manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe to one of the user's collections
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the recipe is already in the
    /// collection, or a database error if the insert fails
    pub async fn add(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<i64> {
        let table = collection.table();
        let result = sqlx::query(&format!(
            "INSERT INTO {table} (user_id, recipe_id, created_at) VALUES ($1, $2, $3)"
        ))
        .bind(user_id)
        .bind(recipe_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                debug!(user_id, recipe_id, %collection, "Recipe added to collection");
                Ok(done.last_insert_rowid())
            }
            Err(e) => {
                let error = DatabaseError::from(e);
                if error.is_unique_violation() {
                    Err(AppError::already_exists(format!(
                        "Recipe {recipe_id} is already in {collection}"
                    )))
                } else {
                    Err(error.into())
                }
            }
        }
    }

    /// Remove a recipe from one of the user's collections
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the recipe is not in the collection, or a
    /// database error if the delete fails
    pub async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<()> {
        let table = collection.table();
        let result = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND recipe_id = $2"
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update {collection}: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input(format!(
                "Recipe {recipe_id} is not in {collection}"
            )));
        }
        Ok(())
    }

    /// Whether the recipe is in the user's collection
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn contains(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let table = collection.table();
        sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE user_id = $1 AND recipe_id = $2)"
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query {collection}: {e}")))
    }

    /// Recipe ids in the user's collection, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_ids(
        &self,
        collection: RecipeCollection,
        user_id: i64,
    ) -> AppResult<Vec<i64>> {
        let table = collection.table();
        sqlx::query_scalar(&format!(
            "SELECT recipe_id FROM {table} WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list {collection}: {e}")))
    }

    /// Every ingredient line of every recipe in the user's cart
    ///
    /// Rows come in cart insertion order, then recipe ingredient order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn shopping_cart_lines(&self, user_id: i64) -> AppResult<Vec<ShoppingLine>> {
        let rows = sqlx::query(
            r"
            SELECT i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            ORDER BY sc.id, ri.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load shopping cart: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(ShoppingLine {
                    name: row.try_get("name")?,
                    measurement_unit: row.try_get("measurement_unit")?,
                    amount: row.try_get("amount")?,
                })
            })
            .collect()
    }
}
