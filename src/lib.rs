// ABOUTME: Main library entry point for the recipe sharing server
// ABOUTME: Provides the REST API, persistence, shopping list aggregation, and short links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # Recipe Share Server
//!
//! A recipe sharing backend: users publish recipes built from catalog
//! ingredients and tags, keep favorites, collect recipes into a shopping
//! cart, and follow other authors.
//!
//! ## Features
//!
//! - **Shopping lists**: the cart is aggregated into a plain-text list with
//!   amounts summed per ingredient and unit
//! - **Short links**: every recipe gets a short, collision-free token that
//!   redirects to the recipe
//! - **REST API**: JSON endpoints for users, catalog, recipes, and
//!   subscriptions served by `axum`
//!
//! ## Architecture
//!
//! - **database**: `SQLite` schema and per-domain managers over a shared pool
//! - **services**: shopping list aggregation, link allocation, recipe writes
//! - **routes**: HTTP handlers grouped by resource
//! - **config** / **logging**: environment-driven setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipe_share_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Recipe Share Server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authenticated user extraction from upstream auth headers
pub mod auth;

/// Environment configuration
pub mod config;

/// `SQLite` persistence layer and per-domain managers
pub mod database;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Request tracing and CORS middleware
pub mod middleware;

/// Absolute URLs for paginated responses
pub mod pagination;

/// Shared server resources handed to every route
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly and lifecycle
pub mod server;

/// Domain services (shopping lists, short links, recipe writes)
pub mod services;

/// Application constants
pub use recipe_share_core::constants;

/// Domain models
pub use recipe_share_core::models;
