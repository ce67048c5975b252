// ABOUTME: Tag and ingredient catalog database operations
// ABOUTME: Read-mostly lookups plus get-or-create used by the catalog loader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use std::collections::HashSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::Database;
use crate::constants::limits::{MAX_NAME_LENGTH, MAX_UNIT_LENGTH};
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, NewIngredient, NewTag, Tag};

impl Database {
    /// Create the tags and ingredients tables
    pub(super) async fn migrate_catalog(&self) -> AppResult<()> {
        self.execute_ddl(&[
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                measurement_unit TEXT NOT NULL,
                UNIQUE (name, measurement_unit)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)",
        ])
        .await
    }
}

/// Catalog database operations manager
pub struct CatalogManager {
    pool: SqlitePool,
}

impl CatalogManager {
    /// Create a new catalog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// List every tag ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_tag(&self, id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag {id}: {e}")))?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// Return the tag with this slug, creating it when absent
    ///
    /// The boolean is `true` when a new row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is malformed, the name is taken by a
    /// different slug, or the database query fails
    pub async fn get_or_create_tag(&self, tag: &NewTag) -> AppResult<(Tag, bool)> {
        if !tag.has_valid_slug() {
            return Err(AppError::invalid_input(format!(
                "Tag slug {:?} may only contain letters, digits, '-' and '_'",
                tag.slug
            )));
        }

        let inserted = sqlx::query("INSERT INTO tags (name, slug) VALUES ($1, $2) ON CONFLICT (slug) DO NOTHING")
            .bind(&tag.name)
            .bind(&tag.slug)
            .execute(&self.pool)
            .await?
            .rows_affected()
            > 0;

        let row = sqlx::query("SELECT id, name, slug FROM tags WHERE slug = $1")
            .bind(&tag.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load tag {}: {e}", tag.slug)))?;

        Ok((row_to_tag(&row)?, inserted))
    }

    /// Subset of `ids` that exist as tags
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn existing_tag_ids(&self, ids: &[i64]) -> AppResult<HashSet<i64>> {
        self.existing_ids("tags", ids).await
    }

    // ========================================================================
    // Ingredients
    // ========================================================================

    /// List ingredients ordered by name, optionally filtered by a
    /// case-insensitive name prefix
    ///
    /// `SQLite`'s `LIKE` folds ASCII only, so the prefix match runs here to
    /// cover Cyrillic names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ingredients(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        let prefix = name_prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_lowercase);

        rows.iter()
            .map(row_to_ingredient)
            .filter(|ingredient| match (&prefix, ingredient) {
                (Some(prefix), Ok(ingredient)) => ingredient.name.to_lowercase().starts_with(prefix),
                _ => true,
            })
            .collect()
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_ingredient(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let row =
            sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to get ingredient {id}: {e}")))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }

    /// Return the ingredient with this (name, unit), creating it when absent
    ///
    /// The boolean is `true` when a new row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_or_create_ingredient(
        &self,
        ingredient: &NewIngredient,
    ) -> AppResult<(Ingredient, bool)> {
        if !ingredient.is_well_formed() {
            return Err(AppError::invalid_input(format!(
                "Ingredient {:?} ({:?}) needs a name of at most {MAX_NAME_LENGTH} and a unit of at most {MAX_UNIT_LENGTH} characters",
                ingredient.name, ingredient.measurement_unit
            )));
        }

        let inserted = sqlx::query(
            r"
            INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)
            ON CONFLICT (name, measurement_unit) DO NOTHING
            ",
        )
        .bind(&ingredient.name)
        .bind(&ingredient.measurement_unit)
        .execute(&self.pool)
        .await?
        .rows_affected()
            > 0;

        let row = sqlx::query(
            "SELECT id, name, measurement_unit FROM ingredients WHERE name = $1 AND measurement_unit = $2",
        )
        .bind(&ingredient.name)
        .bind(&ingredient.measurement_unit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to load ingredient {}: {e}", ingredient.name))
        })?;

        Ok((row_to_ingredient(&row)?, inserted))
    }

    /// Subset of `ids` that exist as ingredients
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn existing_ingredient_ids(&self, ids: &[i64]) -> AppResult<HashSet<i64>> {
        self.existing_ids("ingredients", ids).await
    }

    async fn existing_ids(&self, table: &str, ids: &[i64]) -> AppResult<HashSet<i64>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: Vec<i64> = query
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up {table}: {e}")))?;

        Ok(found.into_iter().collect())
    }
}

/// Convert a database row to a `Tag`
pub(crate) fn row_to_tag(row: &SqliteRow) -> AppResult<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
    })
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    Ok(Ingredient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        measurement_unit: row.try_get("measurement_unit")?,
    })
}
