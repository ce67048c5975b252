// ABOUTME: CORS layer for browser clients of the recipe API
// ABOUTME: Allows the forwarded-user and request-id headers and exposes download filenames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use http::header::{self, HeaderName};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::tracing::REQUEST_ID_HEADER;
use crate::auth::AUTHENTICATED_USER_HEADER;
use crate::config::environment::ServerConfig;

/// Parse a comma-separated origin list; `None` means any origin
fn parse_origins(raw: &str) -> Option<Vec<HeaderValue>> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return None;
    }

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    (!origins.is_empty()).then_some(origins)
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGINS`
///
/// ```bash
/// export CORS_ALLOWED_ORIGINS="https://recipes.example.com,https://admin.example.com"
/// ```
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let allow_origin = parse_origins(&config.cors_allowed_origins)
        .map_or_else(AllowOrigin::any, AllowOrigin::list);

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static(AUTHENTICATED_USER_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}
