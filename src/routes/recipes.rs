// ABOUTME: Recipe route handlers including favorites, shopping cart, short link URLs, and list download
// ABOUTME: Writes go through RecipeService; reads assemble details for the optional viewer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Recipe Routes
//!
//! ## Endpoints
//!
//! - `GET|POST /api/recipes` - Filtered list / create
//! - `GET|PATCH|DELETE /api/recipes/:id` - Detail / update / delete
//! - `POST|DELETE /api/recipes/:id/favorite` - Favorite / unfavorite
//! - `POST|DELETE /api/recipes/:id/shopping_cart` - Add to / remove from cart
//! - `GET /api/recipes/:id/get-link` - Absolute short link URL
//! - `GET /api/recipes/download_shopping_cart` - Aggregated shopping list as text

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use super::{json_body, path_id};
use super::query::QueryParams;
use crate::auth::{authenticate, optional_user};
use crate::constants::short_links::RESOLVE_PREFIX;
use crate::constants::shopping_list::{CONTENT_TYPE, FILENAME};
use crate::database::RecipeFilter;
use crate::errors::{AppError, FieldErrors};
use crate::models::{RecipeCollection, RecipeSummary};
use crate::pagination::PageLinks;
use crate::resources::ServerResources;
use crate::services::recipes::{load_detail, RecipePayload, RecipeService};
use crate::services::shopping_list::build_for_user;
use crate::services::short_links::ShortLinkAllocator;

/// Routes for recipes and per-user recipe collections
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite",
                post(Self::handle_favorite).delete(Self::handle_unfavorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .route("/api/recipes/:id/get-link", get(Self::handle_get_link))
            .with_state(resources)
    }

    fn parse_filter(params: &QueryParams, errors: &mut FieldErrors) -> RecipeFilter {
        RecipeFilter {
            author: params.int("author", errors),
            tags: params.all("tags"),
            is_favorited: params.flag("is_favorited", errors),
            is_in_shopping_cart: params.flag("is_in_shopping_cart", errors),
        }
    }

    /// Handle the filtered, paginated recipe list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let viewer = optional_user(&headers, &resources.database).await?;
        let viewer_id = viewer.as_ref().map(|u| u.id);

        let params = QueryParams::parse(raw.as_deref());
        let mut errors = FieldErrors::new();
        let filter = Self::parse_filter(&params, &mut errors);
        let page = resources.page_params(params.page(&mut errors));
        errors.into_result()?;

        let (recipes, total) = resources
            .database
            .recipes()
            .list(&filter, viewer_id, page)
            .await?;

        let mut details = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            details.push(load_detail(&resources.database, recipe, viewer_id).await?);
        }

        let links = PageLinks::new(
            &resources.config.base_url,
            "/api/recipes",
            params.carried_pairs(),
        )?;
        Ok(Json(links.page(details, total, page)).into_response())
    }

    /// Handle recipe creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<RecipePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let author = authenticate(&headers, &resources.database).await?;
        let payload = json_body(body)?;

        let recipe_id = RecipeService::new(&resources.database)
            .create(author.id, payload)
            .await?;

        let recipe = resources.database.recipes().require(recipe_id).await?;
        let detail = load_detail(&resources.database, recipe, Some(author.id)).await?;
        Ok((StatusCode::CREATED, Json(detail)).into_response())
    }

    /// Handle recipe detail
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let viewer = optional_user(&headers, &resources.database).await?;
        let recipe = resources.database.recipes().require(id).await?;
        let detail = load_detail(&resources.database, recipe, viewer.map(|u| u.id)).await?;
        Ok(Json(detail).into_response())
    }

    /// Handle a partial update by the author
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
        body: Result<Json<RecipePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let editor = authenticate(&headers, &resources.database).await?;
        let payload = json_body(body)?;

        RecipeService::new(&resources.database)
            .update(editor.id, id, payload)
            .await?;

        let recipe = resources.database.recipes().require(id).await?;
        let detail = load_detail(&resources.database, recipe, Some(editor.id)).await?;
        Ok(Json(detail).into_response())
    }

    /// Handle deletion by the author
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let editor = authenticate(&headers, &resources.database).await?;
        RecipeService::new(&resources.database)
            .delete(editor.id, id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn add_to_collection(
        resources: &ServerResources,
        headers: &HeaderMap,
        collection: RecipeCollection,
        recipe_id: i64,
    ) -> Result<Response, AppError> {
        let user = authenticate(headers, &resources.database).await?;
        let recipe = resources.database.recipes().require(recipe_id).await?;

        resources
            .database
            .collections()
            .add(collection, user.id, recipe.id)
            .await?;
        info!(user.id = user.id, recipe.id = recipe.id, %collection, "Recipe added");

        Ok((StatusCode::CREATED, Json(RecipeSummary::from(&recipe))).into_response())
    }

    async fn remove_from_collection(
        resources: &ServerResources,
        headers: &HeaderMap,
        collection: RecipeCollection,
        recipe_id: i64,
    ) -> Result<Response, AppError> {
        let user = authenticate(headers, &resources.database).await?;
        let recipe = resources.database.recipes().require(recipe_id).await?;

        resources
            .database
            .collections()
            .remove(collection, user.id, recipe.id)
            .await?;
        info!(user.id = user.id, recipe.id = recipe.id, %collection, "Recipe removed");

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        Self::add_to_collection(&resources, &headers, RecipeCollection::Favorites, id).await
    }

    async fn handle_unfavorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        Self::remove_from_collection(&resources, &headers, RecipeCollection::Favorites, id).await
    }

    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        Self::add_to_collection(&resources, &headers, RecipeCollection::ShoppingCart, id).await
    }

    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        Self::remove_from_collection(&resources, &headers, RecipeCollection::ShoppingCart, id)
            .await
    }

    /// Handle the short link URL, assigning a link to recipes that lack one
    async fn handle_get_link(
        State(resources): State<Arc<ServerResources>>,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let mut conn = resources.database.pool().acquire().await?;
        let link = ShortLinkAllocator::default()
            .ensure_link(&mut conn, id)
            .await?;

        let url = resources.public_url(&format!("{RESOLVE_PREFIX}/{link}"));
        Ok(Json(serde_json::json!({ "short-link": url })).into_response())
    }

    /// Handle the shopping list download
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let list = build_for_user(&resources.database, user.id).await?;
        info!(
            user.id = user.id,
            items = list.items().len(),
            "Shopping list downloaded"
        );

        let disposition = format!("attachment; filename=\"{FILENAME}\"");
        Ok((
            [
                (header::CONTENT_TYPE, CONTENT_TYPE.to_owned()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            list.render(),
        )
            .into_response())
    }
}
