// ABOUTME: Route module organization for the recipe sharing HTTP endpoints
// ABOUTME: Assembles the per-domain routers into the application router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Route module for the recipe sharing server
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the database managers and service layer.

/// Tag and ingredient catalog routes
pub mod catalog;
/// Liveness and readiness routes
pub mod health;
/// Query string parsing shared by list endpoints
pub mod query;
/// Recipe, favorite, shopping cart, and short link URL routes
pub mod recipes;
/// Short link redirect route
pub mod short_links;
/// Registration, profile, and subscription routes
pub mod users;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::{Json, Router};

pub use catalog::CatalogRoutes;
pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;
pub use short_links::ShortLinkRoutes;
pub use users::UserRoutes;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(UserRoutes::routes(Arc::clone(resources)))
        .merge(CatalogRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)))
        .merge(ShortLinkRoutes::routes(Arc::clone(resources)))
}

/// Unwrap a JSON body, reporting malformed bodies as `INVALID_INPUT`
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

/// Unwrap a numeric path id; ids that do not parse name no resource
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id).map_err(|rejection| {
        AppError::new(ErrorCode::ResourceNotFound, rejection.body_text())
    })
}
