// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, server resources, and user/catalog/recipe factories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]
//! Shared test utilities for `recipe_share_server`

use std::sync::{Arc, Once};

use anyhow::Result;
use recipe_share_server::{
    config::environment::{Environment, ServerConfig},
    database::Database,
    models::{Ingredient, IngredientAmount, NewIngredient, NewTag, NewUser, Tag, User},
    resources::ServerResources,
    services::recipes::{RecipePayload, RecipeService},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    Ok(Arc::new(Database::new("sqlite::memory:").await?))
}

/// Configuration used by HTTP tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_owned(),
        environment: Environment::Testing,
        bcrypt_cost: 4,
        ..ServerConfig::default()
    }
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(Arc::new(ServerResources::new(database, test_config())))
}

/// Create a user named `username` with an `@example.com` address
pub async fn create_test_user(database: &Database, username: &str) -> Result<User> {
    let user = NewUser {
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: username.to_owned(),
        password_hash: "$2b$04$not-a-real-hash".to_owned(),
    };
    Ok(database.users().create(&user).await?)
}

/// Ingredients and tags every recipe test can use
pub struct TestCatalog {
    pub flour: Ingredient,
    pub sugar: Ingredient,
    pub egg: Ingredient,
    pub milk: Ingredient,
    pub breakfast: Tag,
    pub lunch: Tag,
}

/// Seed a small catalog
pub async fn seed_catalog(database: &Database) -> Result<TestCatalog> {
    let catalog = database.catalog();

    let ingredient = |name: &str, unit: &str| NewIngredient {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    };
    let tag = |name: &str, slug: &str| NewTag {
        name: name.to_owned(),
        slug: slug.to_owned(),
    };

    Ok(TestCatalog {
        flour: catalog.get_or_create_ingredient(&ingredient("Мука", "г")).await?.0,
        sugar: catalog.get_or_create_ingredient(&ingredient("Сахар", "г")).await?.0,
        egg: catalog.get_or_create_ingredient(&ingredient("Яйцо", "шт.")).await?.0,
        milk: catalog.get_or_create_ingredient(&ingredient("Молоко", "мл")).await?.0,
        breakfast: catalog.get_or_create_tag(&tag("Завтрак", "breakfast")).await?.0,
        lunch: catalog.get_or_create_tag(&tag("Обед", "lunch")).await?.0,
    })
}

/// Complete creation payload for a recipe
pub fn recipe_payload(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> RecipePayload {
    RecipePayload {
        name: Some(name.to_owned()),
        text: Some(format!("How to cook {name}")),
        image: Some(format!("recipes/images/{name}.png")),
        cooking_time: Some(15),
        link: None,
        tags: Some(tags.to_vec()),
        ingredients: Some(
            ingredients
                .iter()
                .map(|&(id, amount)| IngredientAmount { id, amount })
                .collect(),
        ),
    }
}

/// Create a recipe through the service layer and return its id
pub async fn create_test_recipe(
    database: &Database,
    author_id: i64,
    name: &str,
    ingredients: &[(i64, i64)],
    tags: &[i64],
) -> Result<i64> {
    let payload = recipe_payload(name, ingredients, tags);
    Ok(RecipeService::new(database).create(author_id, payload).await?)
}
