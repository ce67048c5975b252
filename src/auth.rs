// ABOUTME: Authenticated user extraction and password hashing
// ABOUTME: Trusts the user id forwarded by the upstream auth layer and verifies the user exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! # Authentication Input
//!
//! Token issuance and verification happen upstream. This service receives
//! the verified user id in the [`AUTHENTICATED_USER_HEADER`] request header.

use axum::http::HeaderMap;
use tracing::{debug, warn};

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Header carrying the authenticated user id
pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";

/// Parse the forwarded user id, `Ok(None)` when the header is absent
fn forwarded_user_id(headers: &HeaderMap) -> AppResult<Option<i64>> {
    let Some(value) = headers.get(AUTHENTICATED_USER_HEADER) else {
        return Ok(None);
    };

    let id = value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            warn!("Malformed {AUTHENTICATED_USER_HEADER} header");
            AppError::auth_invalid("Malformed authenticated user header")
        })?;
    Ok(Some(id))
}

/// Load the user named by the auth header
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` when the header is absent or names an unknown
/// user, `AUTH_INVALID` when it is malformed
pub async fn authenticate(headers: &HeaderMap, database: &Database) -> AppResult<User> {
    optional_user(headers, database)
        .await?
        .ok_or_else(AppError::auth_required)
}

/// Load the user named by the auth header, if any
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` when the header names an unknown user,
/// `AUTH_INVALID` when it is malformed, or a database error
pub async fn optional_user(headers: &HeaderMap, database: &Database) -> AppResult<Option<User>> {
    let Some(id) = forwarded_user_id(headers)? else {
        return Ok(None);
    };

    match database.users().get(id).await? {
        Some(user) => Ok(Some(user)),
        None => {
            debug!(user.id = id, "Authenticated user no longer exists");
            Err(AppError::auth_required())
        }
    }
}

/// Hash a password with bcrypt at the given cost
///
/// # Errors
///
/// Returns an internal error if hashing fails
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_forwarded_user_id_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(forwarded_user_id(&headers), Ok(None)));

        headers.insert(AUTHENTICATED_USER_HEADER, HeaderValue::from_static(" 42 "));
        assert!(matches!(forwarded_user_id(&headers), Ok(Some(42))));

        headers.insert(AUTHENTICATED_USER_HEADER, HeaderValue::from_static("-1"));
        assert!(forwarded_user_id(&headers).is_err());

        headers.insert(AUTHENTICATED_USER_HEADER, HeaderValue::from_static("abc"));
        assert!(forwarded_user_id(&headers).is_err());
    }

    #[test]
    fn test_password_is_stored_as_bcrypt_hash() {
        let hash = hash_password("correct horse", 4).unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert!(bcrypt::verify("correct horse", &hash).unwrap());
        assert!(!bcrypt::verify("battery staple", &hash).unwrap());
    }
}
