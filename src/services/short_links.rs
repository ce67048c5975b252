// ABOUTME: Short link token generation, allocation with retry-on-conflict, and resolution
// ABOUTME: Tokens come from a pluggable TokenSource; uniqueness is enforced by the recipes.link index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Short links
//!
//! A recipe's link is written with a guarded `UPDATE ... WHERE link IS NULL`.
//! When the unique index rejects a candidate, the allocator draws another
//! token; when the guard matches no row, another writer got there first and
//! its link is returned instead.

use sqlx::SqliteConnection;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::constants::short_links::{MAX_ALLOCATION_ATTEMPTS, MAX_LINK_LENGTH, TOKEN_LENGTH};
use crate::database::Database;
use crate::errors::{AppError, AppResult, DatabaseError, FieldErrors};

/// Supplier of candidate link tokens
pub trait TokenSource: Send {
    /// Produce the next candidate token
    fn next_token(&mut self) -> String;
}

/// Tokens made of the first three hex digits of a random v4 UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&mut self) -> String {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(TOKEN_LENGTH);
        token
    }
}

/// Assigns links to recipes, retrying when a candidate is already taken
pub struct ShortLinkAllocator<S> {
    source: S,
    max_attempts: u32,
}

impl Default for ShortLinkAllocator<UuidTokens> {
    fn default() -> Self {
        Self::new(UuidTokens)
    }
}

impl<S: TokenSource> ShortLinkAllocator<S> {
    /// Create an allocator with the default attempt budget
    pub const fn new(source: S) -> Self {
        Self {
            source,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// Override the attempt budget
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Make sure the recipe has a link and return it
    ///
    /// Existing links are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the recipe does not exist, or
    /// `INTERNAL_ERROR` when every attempt collided
    pub async fn ensure_link(
        &mut self,
        conn: &mut SqliteConnection,
        recipe_id: i64,
    ) -> AppResult<String> {
        if let Some(link) = current_link(conn, recipe_id).await? {
            return Ok(link);
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.source.next_token();
            let result = sqlx::query("UPDATE recipes SET link = $1 WHERE id = $2 AND link IS NULL")
                .bind(&candidate)
                .bind(recipe_id)
                .execute(&mut *conn)
                .await;

            match result {
                Ok(done) if done.rows_affected() == 1 => {
                    debug!(recipe_id, link = %candidate, attempt, "Short link assigned");
                    return Ok(candidate);
                }
                Ok(_) => {
                    // Either the recipe is gone or a concurrent writer won
                    return current_link(conn, recipe_id).await?.ok_or_else(|| {
                        AppError::internal(format!(
                            "Recipe {recipe_id} has no link after a concurrent assignment"
                        ))
                    });
                }
                Err(e) => {
                    let db_error = DatabaseError::from(e);
                    if !db_error.is_unique_violation_on("recipes.link") {
                        return Err(db_error.into());
                    }
                    warn!(recipe_id, link = %candidate, attempt, "Short link collision, retrying");
                }
            }
        }

        error!(recipe_id, attempts = self.max_attempts, "Short link allocation exhausted");
        Err(AppError::internal(format!(
            "Could not allocate a short link for recipe {recipe_id} after {} attempts",
            self.max_attempts
        )))
    }
}

/// Link currently stored for the recipe
async fn current_link(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<Option<String>> {
    let row: Option<Option<String>> = sqlx::query_scalar("SELECT link FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read link of recipe {recipe_id}: {e}")))?;

    match row {
        Some(link) => Ok(link),
        None => Err(AppError::not_found(format!("Recipe {recipe_id}"))),
    }
}

/// Resolve a token to the id of the recipe holding it
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn resolve(database: &Database, token: &str) -> AppResult<Option<i64>> {
    if !is_valid_link(token) {
        return Ok(None);
    }
    database.recipes().find_id_by_link(token).await
}

/// Whether a client-supplied link is acceptable: 1..=10 of `[a-z0-9]`
#[must_use]
pub fn is_valid_link(link: &str) -> bool {
    !link.is_empty()
        && link.len() <= MAX_LINK_LENGTH
        && link
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Record a validation message when an explicit link is malformed
pub fn validate_explicit_link(link: &str, errors: &mut FieldErrors) {
    if !is_valid_link(link) {
        errors.add(
            "link",
            format!("Must be 1 to {MAX_LINK_LENGTH} lowercase letters or digits"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_tokens_are_short_hex() {
        let mut source = UuidTokens;
        for _ in 0..64 {
            let token = source.next_token();
            assert_eq!(token.len(), TOKEN_LENGTH);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            assert!(is_valid_link(&token));
        }
    }

    #[test]
    fn test_link_validation() {
        assert!(is_valid_link("a1b"));
        assert!(is_valid_link("pancakes10"));
        assert!(!is_valid_link(""));
        assert!(!is_valid_link("pancakes100"));
        assert!(!is_valid_link("ABC"));
        assert!(!is_valid_link("a-b"));
    }
}
