// ABOUTME: User subscription database operations
// ABOUTME: Directed follow pairs with uniqueness and no self-follow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use chrono::Utc;
use recipe_share_core::pagination::PageParams;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::users::row_to_user;
use super::Database;
use crate::errors::{AppError, AppResult, DatabaseError, FieldErrors};
use crate::models::{Follow, User};

impl Database {
    /// Create the follows table
    pub(super) async fn migrate_follows(&self) -> AppResult<()> {
        self.execute_ddl(&[
            r"
            CREATE TABLE IF NOT EXISTS follows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                following_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                UNIQUE (user_id, following_id),
                CHECK (user_id <> following_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id)",
        ])
        .await
    }
}

/// Subscription database operations manager
pub struct FollowsManager {
    pool: SqlitePool,
}

impl FollowsManager {
    /// Create a new follows manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe `user_id` to `following_id`
    ///
    /// # Errors
    ///
    /// Returns a field error on self-follow, `RESOURCE_ALREADY_EXISTS` if
    /// the subscription exists, or a database error if the insert fails
    pub async fn follow(&self, user_id: i64, following_id: i64) -> AppResult<Follow> {
        if user_id == following_id {
            return Err(FieldErrors::single(
                "following",
                "You cannot subscribe to yourself",
            ));
        }

        let created_at = Utc::now();
        let id = sqlx::query(
            "INSERT INTO follows (user_id, following_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(following_id)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let error = DatabaseError::from(e);
            if error.is_unique_violation() {
                AppError::already_exists(format!("Already subscribed to user {following_id}"))
            } else {
                error.into()
            }
        })?
        .last_insert_rowid();

        info!(user_id, following_id, "Subscription created");
        Ok(Follow {
            id,
            user_id,
            following_id,
            created_at,
        })
    }

    /// Remove a subscription
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if there was no such subscription, or a
    /// database error if the delete fails
    pub async fn unfollow(&self, user_id: i64, following_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND following_id = $2")
            .bind(user_id)
            .bind(following_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input(format!(
                "Not subscribed to user {following_id}"
            )));
        }
        Ok(())
    }

    /// Whether `user_id` follows `following_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_following(&self, user_id: i64, following_id: i64) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2)",
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query subscription: {e}")))
    }

    /// Users followed by `user_id`, ordered by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn following(&self, user_id: i64, page: PageParams) -> AppResult<(Vec<User>, i64)> {
        let rows = sqlx::query(
            r"
            SELECT u.id AS id, u.email AS email, u.username AS username,
                   u.first_name AS first_name, u.last_name AS last_name,
                   u.password_hash AS password_hash, u.avatar AS avatar,
                   u.created_at AS created_at
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.user_id = $1
            ORDER BY u.username, u.id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let total = sqlx::query("SELECT COUNT(*) AS total FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?
            .try_get("total")?;

        let users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }
}
