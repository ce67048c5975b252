// ABOUTME: User account records and public profile shapes
// ABOUTME: Includes registration field validation (username pattern, reserved names, lengths)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::limits::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH};
use crate::constants::RESERVED_USERNAMES;
use crate::errors::FieldErrors;

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Unique e-mail address
    pub email: String,
    /// Unique login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Opaque avatar image reference
    pub avatar: Option<String>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Validated registration data ready for insertion
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique e-mail address
    pub email: String,
    /// Unique login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
}

/// Public view of a user as seen by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// E-mail address
    pub email: String,
    /// Primary key
    pub id: i64,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the caller follows this user
    pub is_subscribed: bool,
    /// Opaque avatar image reference
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Build the profile of `user` as seen by a caller who does or does not follow them
    #[must_use]
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: user.avatar.clone(),
        }
    }
}

/// Username characters: word characters plus `.@+-`
fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}

/// Validate a username, recording every problem against the `username` field
pub fn validate_username(username: &str, errors: &mut FieldErrors) {
    if username.is_empty() {
        errors.add("username", "This field is required");
        return;
    }
    if RESERVED_USERNAMES.contains(&username) {
        errors.add("username", format!("Username \"{username}\" is reserved"));
    }
    if !username.chars().all(is_username_char) {
        errors.add(
            "username",
            "May contain only letters, digits, and @/./+/-/_ characters",
        );
    }
    if username.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            "username",
            format!("Must be at most {MAX_NAME_LENGTH} characters"),
        );
    }
}

/// Validate an e-mail address shape and length
pub fn validate_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.add("email", "This field is required");
        return;
    }
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        errors.add("email", "Enter a valid e-mail address");
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.add(
            "email",
            format!("Must be at most {MAX_EMAIL_LENGTH} characters"),
        );
    }
}

/// Validate a required bounded name field (`first_name`, `last_name`)
pub fn validate_person_name(field: &str, value: &str, errors: &mut FieldErrors) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required");
    } else if value.chars().count() > MAX_NAME_LENGTH {
        errors.add(field, format!("Must be at most {MAX_NAME_LENGTH} characters"));
    }
}
