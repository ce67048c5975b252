// ABOUTME: Catalog loader for ingredients and tags from JSON files
// ABOUTME: Uses get-or-create semantics so repeated runs leave the catalog unchanged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Catalog loader.
//!
//! Usage:
//! ```bash
//! # Load ingredients
//! cargo run --bin load-catalog -- --ingredients data/ingredients.json
//!
//! # Load ingredients and tags into a specific database
//! cargo run --bin load-catalog -- --ingredients data/ingredients.json \
//!     --tags data/tags.json --database-url sqlite:./data/recipes.db
//! ```
//!
//! Ingredient files hold `[{"name": ..., "measurement_unit": ...}]`, tag
//! files hold `[{"name": ..., "slug": ...}]`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use recipe_share_server::{
    config::environment::ServerConfig,
    database::Database,
    errors::ErrorCode,
    models::{NewIngredient, NewTag},
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "load-catalog",
    about = "Recipe Share Server catalog loader",
    long_about = "Load ingredients and tags from JSON files into the database"
)]
struct LoadArgs {
    /// Ingredients JSON file
    #[arg(long)]
    ingredients: PathBuf,

    /// Tags JSON file
    #[arg(long)]
    tags: Option<PathBuf>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn load_ingredients(database: &Database, path: &Path) -> Result<(usize, usize)> {
    let ingredients: Vec<NewIngredient> = read_json(path)?;
    let catalog = database.catalog();
    let mut created = 0;

    for ingredient in &ingredients {
        match catalog.get_or_create_ingredient(ingredient).await {
            Ok((_, true)) => created += 1,
            Ok((_, false)) => {}
            Err(e) if e.code == ErrorCode::InvalidInput => {
                warn!("Skipping ingredient {:?}: {e}", ingredient.name);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok((ingredients.len(), created))
}

async fn load_tags(database: &Database, path: &Path) -> Result<(usize, usize)> {
    let tags: Vec<NewTag> = read_json(path)?;
    let catalog = database.catalog();
    let mut created = 0;

    for tag in &tags {
        match catalog.get_or_create_tag(tag).await {
            Ok((_, true)) => created += 1,
            Ok((_, false)) => {}
            Err(e) => warn!("Skipping tag {:?}: {e}", tag.name),
        }
    }
    Ok((tags.len(), created))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = LoadArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Recipe Share Catalog Loader ===");
    let database_url = match args.database_url {
        Some(url) => url,
        None => ServerConfig::from_env()?.database_url,
    };
    info!("Connecting to database: {database_url}");
    let database = Database::new(&database_url).await?;

    let (total, created) = load_ingredients(&database, &args.ingredients).await?;
    info!("Ingredients: {total} read, {created} created");

    if let Some(tags) = &args.tags {
        let (total, created) = load_tags(&database, tags).await?;
        info!("Tags: {total} read, {created} created");
    }

    info!("Catalog loaded");
    Ok(())
}
