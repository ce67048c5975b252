// ABOUTME: Recipe records, ingredient lines, and recipe response shapes
// ABOUTME: A recipe owns its ingredient amounts; its short link is immutable once assigned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::Tag;
use super::user::UserProfile;

/// Stored recipe row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Primary key
    pub id: i64,
    /// Unique recipe name
    pub name: String,
    /// Owning user
    pub author_id: i64,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Short link token, `None` until allocated
    pub link: Option<String>,
    /// Opaque image reference
    pub image: String,
    /// Description
    pub text: String,
    /// Publication time
    pub created_at: DateTime<Utc>,
}

/// Requested ingredient amount in a create/update payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Ingredient primary key
    pub id: i64,
    /// Amount in the ingredient's unit
    pub amount: i64,
}

/// Ingredient as it appears inside a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    /// Ingredient primary key
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Amount in this recipe
    pub amount: i64,
}

/// One ingredient amount from one recipe in a shopping cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingLine {
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Amount used by the recipe
    pub amount: i64,
}

/// Compact recipe shape used in favorites, cart, and subscription responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    /// Primary key
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Opaque image reference
    pub image: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Full recipe as seen by a (possibly anonymous) caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeDetail {
    /// Primary key
    pub id: i64,
    /// Tags in name order
    pub tags: Vec<Tag>,
    /// Author profile
    pub author: UserProfile,
    /// Ingredient lines in insertion order
    pub ingredients: Vec<RecipeIngredientLine>,
    /// Whether the caller has favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the caller's shopping cart
    pub is_in_shopping_cart: bool,
    /// Recipe name
    pub name: String,
    /// Opaque image reference
    pub image: String,
    /// Description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Short link token
    pub link: Option<String>,
}
