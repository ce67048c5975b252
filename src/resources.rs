// ABOUTME: Centralized resource container for dependency injection in route handlers
// ABOUTME: Holds the database handle and the loaded server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! # Server Resources
//!
//! One `Arc<ServerResources>` is created at startup and shared by every
//! router as axum state.

use std::sync::Arc;

use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::pagination::{PageParams, PageQuery};

/// Shared server resources
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Bundle the database and configuration
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        Self {
            database: Arc::new(database),
            config: Arc::new(config),
        }
    }

    /// Normalize a raw pagination query with the configured page sizes
    #[must_use]
    pub fn page_params(&self, query: PageQuery) -> PageParams {
        PageParams::from_query(query, self.config.page_size, self.config.max_page_size)
    }

    /// Absolute public URL for a path (short links, redirects)
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }
}
