// ABOUTME: Association records between users and recipes or other users
// ABOUTME: Favorites and shopping cart entries share one shape; follows are directed user pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::recipe::RecipeSummary;
use super::user::UserProfile;

/// Per-user recipe collections keyed by unique (user, recipe) pairs
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCollection {
    /// Bookmarked recipes
    Favorites,
    /// Recipes the user intends to shop for
    ShoppingCart,
}

impl RecipeCollection {
    /// Backing table name
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable label used in messages
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl Display for RecipeCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Membership of a recipe in a user's collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionEntry {
    /// Primary key; ascending id is insertion order
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Referenced recipe
    pub recipe_id: i64,
    /// When the recipe was added
    pub created_at: DateTime<Utc>,
}

/// Directed subscription from `user_id` to `following_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Follow {
    /// Primary key
    pub id: i64,
    /// Subscriber
    pub user_id: i64,
    /// Followed author
    pub following_id: i64,
    /// When the subscription was created
    pub created_at: DateTime<Utc>,
}

/// Followed author together with a preview of their recipes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowedAuthor {
    /// Author profile (`is_subscribed` is always true from the follower's view)
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Newest recipes first, possibly truncated by `recipes_limit`
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author
    pub recipes_count: i64,
}
