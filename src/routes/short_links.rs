// ABOUTME: Short link redirect route
// ABOUTME: Resolves a link token and redirects to the recipe detail location
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::debug;

use crate::constants::short_links::RESOLVE_PREFIX;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::short_links::resolve;

/// Routes for short link resolution
pub struct ShortLinkRoutes;

impl ShortLinkRoutes {
    /// Create the redirect route under the resolve prefix
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(&format!("{RESOLVE_PREFIX}/:link"), get(Self::handle_resolve))
            .with_state(resources)
    }

    /// `302 Found` to `/api/recipes/{id}`, or 404 for unknown tokens
    async fn handle_resolve(
        State(resources): State<Arc<ServerResources>>,
        Path(link): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = resolve(&resources.database, &link)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Short link {link}")))?;

        debug!(%link, recipe.id = recipe_id, "Short link resolved");
        let location = format!("/api/recipes/{recipe_id}");
        Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
    }
}
