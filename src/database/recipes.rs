// ABOUTME: Recipe database operations: schema, filtered listing, lookups, and transactional writes
// ABOUTME: RecipeWriter runs inside a caller-owned transaction; RecipesManager reads from the pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use chrono::Utc;
use recipe_share_core::pagination::PageParams;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use super::catalog::row_to_tag;
use super::Database;
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::models::{IngredientAmount, Recipe, RecipeIngredientLine, RecipeSummary, Tag};

const RECIPE_COLUMNS: &str = "r.id AS id, r.name AS name, r.author_id AS author_id, \
     r.cooking_time AS cooking_time, r.link AS link, r.image AS image, r.text AS text, \
     r.created_at AS created_at";

impl Database {
    /// Create the recipes, `recipe_tags`, and `recipe_ingredients` tables
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        self.execute_ddl(&[
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                cooking_time INTEGER NOT NULL CHECK (cooking_time >= 1),
                link TEXT UNIQUE,
                image TEXT NOT NULL DEFAULT '',
                text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                UNIQUE (recipe_id, tag_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 32000),
                UNIQUE (recipe_id, ingredient_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
            "CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at DESC, id DESC)",
            "CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag_id)",
            "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
        ])
        .await
    }
}

/// Complete recipe content as written by its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Unique recipe name
    pub name: String,
    /// Description
    pub text: String,
    /// Opaque image reference
    pub image: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Explicit short link; `None` lets the allocator pick one
    pub link: Option<String>,
    /// Tag ids
    pub tags: Vec<i64>,
    /// Ingredient ids with amounts, in display order
    pub ingredients: Vec<IngredientAmount>,
}

/// Recipe list filters; the collection filters only apply to signed-in viewers
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author: Option<i64>,
    /// Recipes carrying any of these tag slugs
    pub tags: Vec<String>,
    /// Keep (`true`) or drop (`false`) the viewer's favorites
    pub is_favorited: Option<bool>,
    /// Keep (`true`) or drop (`false`) recipes in the viewer's cart
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>, viewer: Option<i64>) {
        query.push(" WHERE 1 = 1");

        if let Some(author) = self.author {
            query.push(" AND r.author_id = ").push_bind(author);
        }

        if !self.tags.is_empty() {
            query.push(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug IN (",
            );
            let mut slugs = query.separated(", ");
            for slug in &self.tags {
                slugs.push_bind(slug.clone());
            }
            slugs.push_unseparated("))");
        }

        if let Some(viewer) = viewer {
            for (wanted, table) in [
                (self.is_favorited, "favorites"),
                (self.is_in_shopping_cart, "shopping_cart"),
            ] {
                if let Some(wanted) = wanted {
                    query.push(if wanted { " AND " } else { " AND NOT " });
                    query.push(format!(
                        "EXISTS (SELECT 1 FROM {table} c WHERE c.recipe_id = r.id AND c.user_id = "
                    ));
                    query.push_bind(viewer).push(")");
                }
            }
        }
    }
}

/// Recipe read operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe {id}: {e}")))?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    /// Get a recipe by id or fail with not-found
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no recipe has this id
    pub async fn require(&self, id: i64) -> AppResult<Recipe> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))
    }

    /// Id of the recipe holding this short link
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn find_id_by_link(&self, link: &str) -> AppResult<Option<i64>> {
        sqlx::query_scalar("SELECT id FROM recipes WHERE link = $1")
            .bind(link)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve link {link}: {e}")))
    }

    /// Tags of a recipe ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn tags_for(&self, recipe_id: i64) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query(
            r"
            SELECT t.id AS id, t.name AS name, t.slug AS slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = $1
            ORDER BY t.name, t.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Ingredient lines of a recipe in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn ingredients_for(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredientLine>> {
        let rows = sqlx::query(
            r"
            SELECT i.id AS id, i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(RecipeIngredientLine {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    measurement_unit: row.try_get("measurement_unit")?,
                    amount: row.try_get("amount")?,
                })
            })
            .collect()
    }

    /// List recipes newest first, filtered for `viewer`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageParams,
    ) -> AppResult<(Vec<Recipe>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
        filter.push_where(&mut count_query, viewer);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut query = QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r"));
        filter.push_where(&mut query, viewer);
        query
            .push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows.iter().map(row_to_recipe).collect::<AppResult<Vec<_>>>()?;
        Ok((recipes, total))
    }

    /// Newest recipes by an author as summaries, optionally truncated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn summaries_by_author(
        &self,
        author_id: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<RecipeSummary>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, image, cooking_time
            FROM recipes
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(author_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(row_to_summary).collect()
    }

    /// Number of recipes by an author
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))
    }

    /// Delete a recipe; its tags, ingredient lines, and collection entries cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe {id}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Recipe writes bound to one connection, normally an open transaction
pub struct RecipeWriter<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> RecipeWriter<'c> {
    /// Wrap a connection or transaction
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert the recipe row with its tags and ingredients, returning the new id
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when the name or the explicit link
    /// is taken, or a database error if any insert fails
    pub async fn insert(&mut self, author_id: i64, draft: &RecipeDraft) -> AppResult<i64> {
        let id = sqlx::query(
            r"
            INSERT INTO recipes (name, author_id, cooking_time, link, image, text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&draft.name)
        .bind(author_id)
        .bind(draft.cooking_time)
        .bind(draft.link.as_deref())
        .bind(&draft.image)
        .bind(&draft.text)
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| recipe_write_error(e, draft))?
        .last_insert_rowid();

        self.replace_tags(id, &draft.tags).await?;
        self.replace_ingredients(id, &draft.ingredients).await?;
        Ok(id)
    }

    /// Overwrite content, tags, and ingredients; the link is left untouched
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the recipe vanished,
    /// `RESOURCE_ALREADY_EXISTS` if the new name is taken, or a database error
    pub async fn update(&mut self, id: i64, draft: &RecipeDraft) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, cooking_time = $2, image = $3, text = $4
            WHERE id = $5
            ",
        )
        .bind(&draft.name)
        .bind(draft.cooking_time)
        .bind(&draft.image)
        .bind(&draft.text)
        .bind(id)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| recipe_write_error(e, draft))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        self.replace_tags(id, &draft.tags).await?;
        self.replace_ingredients(id, &draft.ingredients).await
    }

    async fn replace_tags(&mut self, recipe_id: i64, tags: &[i64]) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *self.conn)
            .await?;

        for tag_id in tags {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut *self.conn)
                .await?;
        }
        Ok(())
    }

    async fn replace_ingredients(
        &mut self,
        recipe_id: i64,
        ingredients: &[IngredientAmount],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *self.conn)
            .await?;

        for line in ingredients {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(line.id)
            .bind(line.amount)
            .execute(&mut *self.conn)
            .await?;
        }
        Ok(())
    }
}

fn recipe_write_error(error: sqlx::Error, draft: &RecipeDraft) -> AppError {
    let error = DatabaseError::from(error);
    if error.is_unique_violation_on("recipes.name") {
        AppError::already_exists(format!("A recipe named {:?} already exists", draft.name))
    } else if error.is_unique_violation_on("recipes.link") {
        AppError::already_exists(format!(
            "Short link {:?} is already taken",
            draft.link.as_deref().unwrap_or_default()
        ))
    } else {
        error.into()
    }
}

/// Convert a database row to a `Recipe`
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    Ok(Recipe {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        author_id: row.try_get("author_id")?,
        cooking_time: row.try_get("cooking_time")?,
        link: row.try_get("link")?,
        image: row.try_get("image")?,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Convert a database row to a `RecipeSummary`
pub(crate) fn row_to_summary(row: &SqliteRow) -> AppResult<RecipeSummary> {
    Ok(RecipeSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        image: row.try_get("image")?,
        cooking_time: row.try_get("cooking_time")?,
    })
}
