// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Environment-based configuration management

use std::env;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::errors::{AppError, AppResult};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/recipes.db";

/// Default public base URL used for short links and pagination
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// `SQLite` connection URL
    pub database_url: String,
    /// Public base URL (scheme, host, optional port; no trailing slash)
    pub base_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
    /// Default page size for list endpoints
    pub page_size: i64,
    /// Upper bound for client-requested page sizes
    pub max_page_size: i64,
    /// Comma-separated CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            environment: Environment::Development,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a numeric variable does not parse,
    /// the base URL is not absolute, or the page sizes are inconsistent
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env_or("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            base_url: env_var_or("BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            bcrypt_cost: parse_env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            page_size: parse_env_or("PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_page_size: parse_env_or("MAX_PAGE_SIZE", MAX_PAGE_SIZE)?,
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first inconsistency
    pub fn validate(&self) -> AppResult<()> {
        Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("BASE_URL is not an absolute URL: {e}")))?;

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(AppError::config(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        if self.page_size < 1 || self.max_page_size < self.page_size {
            return Err(AppError::config(format!(
                "PAGE_SIZE ({}) must be positive and not exceed MAX_PAGE_SIZE ({})",
                self.page_size, self.max_page_size
            )));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Recipe Share Server Configuration: HTTP Port: {}, Database: {}, Base URL: {}, \
             Environment: {}, Page Size: {}/{}",
            self.http_port,
            self.database_url,
            self.base_url,
            self.environment,
            self.page_size,
            self.max_page_size,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key} ({raw:?}): {e}"))),
        Err(_) => Ok(default),
    }
}
