// ABOUTME: Read-only tag and ingredient catalog route handlers
// ABOUTME: Ingredient listing supports a case-insensitive name prefix filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::path_id;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Routes for tags and ingredients
pub struct CatalogRoutes;

/// Ingredient search parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags", get(Self::handle_list_tags))
            .route("/api/tags/:id", get(Self::handle_get_tag))
            .route("/api/ingredients", get(Self::handle_list_ingredients))
            .route("/api/ingredients/:id", get(Self::handle_get_ingredient))
            .with_state(resources)
    }

    async fn handle_list_tags(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags = resources.database.catalog().list_tags().await?;
        Ok(Json(tags).into_response())
    }

    async fn handle_get_tag(
        State(resources): State<Arc<ServerResources>>,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let tag = resources
            .database
            .catalog()
            .get_tag(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {id}")))?;
        Ok(Json(tag).into_response())
    }

    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
        Query(search): Query<IngredientSearch>,
    ) -> Result<Response, AppError> {
        let prefix = search.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let ingredients = resources.database.catalog().list_ingredients(prefix).await?;
        Ok(Json(ingredients).into_response())
    }

    async fn handle_get_ingredient(
        State(resources): State<Arc<ServerResources>>,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let ingredient = resources
            .database
            .catalog()
            .get_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))?;
        Ok(Json(ingredient).into_response())
    }
}
