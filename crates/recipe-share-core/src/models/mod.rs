// ABOUTME: Core data models for the recipe sharing server
// ABOUTME: Users, catalog entries, recipes, and the association records between them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Domain models
//!
//! Records mirror the relational schema one-to-one; response shapes
//! (`UserProfile`, `RecipeDetail`, `RecipeSummary`, `FollowedAuthor`) are
//! explicit structs rather than reflective serializers.

/// Tags and ingredients
pub mod catalog;
/// Recipes and their ingredient lines
pub mod recipe;
/// Favorites, shopping cart, and follows
pub mod social;
/// User accounts and public profiles
pub mod user;

pub use catalog::{Ingredient, NewIngredient, NewTag, Tag};
pub use recipe::{
    IngredientAmount, Recipe, RecipeDetail, RecipeIngredientLine, RecipeSummary,
    ShoppingLine,
};
pub use social::{CollectionEntry, Follow, FollowedAuthor, RecipeCollection};
pub use user::{NewUser, User, UserProfile};
