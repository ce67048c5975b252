// ABOUTME: Server binary for the recipe sharing REST API
// ABOUTME: Loads configuration, initializes logging and the database, then serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! # Recipe Share Server Binary
//!
//! Configuration comes from the environment (see `ServerConfig::from_env`);
//! `--http-port` and `--database-url` override it.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use recipe_share_server::{
    config::environment::ServerConfig, database::Database, logging, resources::ServerResources,
    server,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "recipe-share-server")]
#[command(about = "Recipe Share Server - recipes, shopping lists, and short links over HTTP")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;
    info!("Starting Recipe Share Server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized: {}", config.database_url);

    let resources = Arc::new(ServerResources::new(database, config));
    if let Err(e) = server::run(resources).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
