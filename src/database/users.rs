// ABOUTME: User management database operations
// ABOUTME: Handles registration, lookup, listing, and deletion of user accounts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use chrono::Utc;
use recipe_share_core::pagination::PageParams;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::Database;
use crate::errors::{AppError, AppResult, DatabaseError, FieldErrors};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, avatar, created_at";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        self.execute_ddl(&[r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                avatar TEXT,
                created_at TEXT NOT NULL
            )
            "])
        .await
    }
}

/// User account database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns a field validation error when the e-mail or username is
    /// already taken, or a database error if the insert fails
    pub async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut taken = self.find_taken_fields(&user.email, &user.username).await?;
        if !taken.is_empty() {
            return Err(taken.into_error());
        }

        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(e) => {
                let error = DatabaseError::from(e);
                if error.is_unique_violation_on("users.email") {
                    taken.add("email", "A user with this e-mail already exists");
                } else if error.is_unique_violation_on("users.username") {
                    taken.add("username", "A user with this username already exists");
                } else {
                    return Err(AppError::database(format!("Failed to create user: {error}")));
                }
                return Err(taken.into_error());
            }
        };

        info!(user.id = id, user.username = %user.username, "User registered");
        self.get(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("User {id} vanished after insert")))
    }

    /// Report which of the unique registration fields are already in use
    async fn find_taken_fields(&self, email: &str, username: &str) -> AppResult<FieldErrors> {
        let row = sqlx::query(
            r"
            SELECT
                EXISTS(SELECT 1 FROM users WHERE email = $1) AS email_taken,
                EXISTS(SELECT 1 FROM users WHERE username = $2) AS username_taken
            ",
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check user uniqueness: {e}")))?;

        let mut errors = FieldErrors::new();
        if row.try_get::<bool, _>("email_taken")? {
            errors.add("email", "A user with this e-mail already exists");
        }
        if row.try_get::<bool, _>("username_taken")? {
            errors.add("username", "A user with this username already exists");
        }
        Ok(errors)
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user {id}: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by username (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 COLLATE NOCASE"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user {username}: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// List users ordered by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, page: PageParams) -> AppResult<(Vec<User>, i64)> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username, id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }

    /// Set or clear the avatar reference
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn set_avatar(&self, id: i64, avatar: Option<&str>) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET avatar = $1 WHERE id = $2")
            .bind(avatar)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update avatar: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a user; recipes, collections, and follows cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user {id}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a `User`
pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        password_hash: row.try_get("password_hash")?,
        avatar: row.try_get("avatar")?,
        created_at: row.try_get("created_at")?,
    })
}
