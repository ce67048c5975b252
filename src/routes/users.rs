// ABOUTME: User registration, profile, avatar, and subscription route handlers
// ABOUTME: Profiles carry is_subscribed relative to the authenticated caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! User Routes
//!
//! ## Endpoints
//!
//! - `POST /api/users` - Register
//! - `GET /api/users` - Paginated user list
//! - `GET /api/users/me` - Current user
//! - `PUT|DELETE /api/users/me/avatar` - Set or clear the avatar reference
//! - `GET /api/users/subscriptions` - Followed authors with recipe previews
//! - `GET /api/users/:id` - User profile
//! - `POST|DELETE /api/users/:id/subscribe` - Follow or unfollow

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use super::{json_body, path_id};
use super::query::QueryParams;
use crate::auth::{authenticate, hash_password, optional_user};
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::user::{validate_email, validate_person_name, validate_username};
use crate::models::{FollowedAuthor, NewUser, User, UserProfile};
use crate::pagination::PageLinks;
use crate::resources::ServerResources;

/// Routes for users and subscriptions
pub struct UserRoutes;

/// Registration request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// E-mail address
    pub email: Option<String>,
    /// Login name
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Plain-text password, hashed before storage
    pub password: Option<String>,
}

/// Avatar update request body
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarRequest {
    /// Opaque image reference
    pub avatar: Option<String>,
}

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users",
                post(Self::handle_register).get(Self::handle_list),
            )
            .route("/api/users/me", get(Self::handle_me))
            .route(
                "/api/users/me/avatar",
                put(Self::handle_set_avatar).delete(Self::handle_clear_avatar),
            )
            .route("/api/users/subscriptions", get(Self::handle_subscriptions))
            .route("/api/users/:id", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    fn validate_registration(request: RegisterRequest) -> AppResult<(NewUser, String)> {
        let mut errors = FieldErrors::new();
        let email = request.email.unwrap_or_default().trim().to_owned();
        let username = request.username.unwrap_or_default().trim().to_owned();
        let first_name = request.first_name.unwrap_or_default().trim().to_owned();
        let last_name = request.last_name.unwrap_or_default().trim().to_owned();
        let password = request.password.unwrap_or_default();

        validate_email(&email, &mut errors);
        validate_username(&username, &mut errors);
        validate_person_name("first_name", &first_name, &mut errors);
        validate_person_name("last_name", &last_name, &mut errors);
        if password.is_empty() {
            errors.add("password", "This field is required");
        }
        errors.into_result()?;

        let user = NewUser {
            email,
            username,
            first_name,
            last_name,
            password_hash: String::new(),
        };
        Ok((user, password))
    }

    /// Profile of `user` as seen by `viewer`
    async fn profile_for(
        resources: &ServerResources,
        user: &User,
        viewer: Option<&User>,
    ) -> AppResult<UserProfile> {
        let is_subscribed = match viewer {
            Some(viewer) => {
                resources
                    .database
                    .follows()
                    .is_following(viewer.id, user.id)
                    .await?
            }
            None => false,
        };
        Ok(UserProfile::from_user(user, is_subscribed))
    }

    /// Followed author with at most `recipes_limit` newest recipes
    async fn followed_author(
        resources: &ServerResources,
        author: &User,
        recipes_limit: Option<i64>,
    ) -> AppResult<FollowedAuthor> {
        let recipes = resources.database.recipes();
        Ok(FollowedAuthor {
            profile: UserProfile::from_user(author, true),
            recipes: recipes.summaries_by_author(author.id, recipes_limit).await?,
            recipes_count: recipes.count_by_author(author.id).await?,
        })
    }

    fn recipes_limit(params: &QueryParams, errors: &mut FieldErrors) -> Option<i64> {
        let limit = params.int("recipes_limit", errors)?;
        if limit < 0 {
            errors.add("recipes_limit", "Must not be negative");
            return None;
        }
        Some(limit)
    }

    async fn require_user(resources: &ServerResources, id: i64) -> AppResult<User> {
        resources
            .database
            .users()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id}")))
    }

    /// Handle registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<RegisterRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let (mut new_user, password) = Self::validate_registration(json_body(body)?)?;
        new_user.password_hash = hash_password(&password, resources.config.bcrypt_cost)?;

        let user = resources.database.users().create(&new_user).await?;

        Ok((StatusCode::CREATED, Json(UserProfile::from_user(&user, false))).into_response())
    }

    /// Handle the paginated user list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let viewer = optional_user(&headers, &resources.database).await?;
        let params = QueryParams::parse(raw.as_deref());
        let mut errors = FieldErrors::new();
        let page = resources.page_params(params.page(&mut errors));
        errors.into_result()?;

        let (users, total) = resources.database.users().list(page).await?;
        let mut profiles = Vec::with_capacity(users.len());
        for user in &users {
            profiles.push(Self::profile_for(&resources, user, viewer.as_ref()).await?);
        }

        let links = PageLinks::new(&resources.config.base_url, "/api/users", params.carried_pairs())?;
        Ok(Json(links.page(profiles, total, page)).into_response())
    }

    /// Handle the current user's profile
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        Ok(Json(UserProfile::from_user(&user, false)).into_response())
    }

    /// Handle setting the avatar reference
    async fn handle_set_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<AvatarRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let avatar = json_body(body)?
            .avatar
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| FieldErrors::single("avatar", "This field is required"))?;

        resources
            .database
            .users()
            .set_avatar(user.id, Some(&avatar))
            .await?;
        Ok(Json(serde_json::json!({ "avatar": avatar })).into_response())
    }

    /// Handle clearing the avatar reference
    async fn handle_clear_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        resources.database.users().set_avatar(user.id, None).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle the followed authors list
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources.database).await?;
        let params = QueryParams::parse(raw.as_deref());
        let mut errors = FieldErrors::new();
        let page = resources.page_params(params.page(&mut errors));
        let recipes_limit = Self::recipes_limit(&params, &mut errors);
        errors.into_result()?;

        let (authors, total) = resources.database.follows().following(user.id, page).await?;
        let mut results = Vec::with_capacity(authors.len());
        for author in &authors {
            results.push(Self::followed_author(&resources, author, recipes_limit).await?);
        }

        let links = PageLinks::new(
            &resources.config.base_url,
            "/api/users/subscriptions",
            params.carried_pairs(),
        )?;
        Ok(Json(links.page(results, total, page)).into_response())
    }

    /// Handle a single profile
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let viewer = optional_user(&headers, &resources.database).await?;
        let user = Self::require_user(&resources, id).await?;
        let profile = Self::profile_for(&resources, &user, viewer.as_ref()).await?;
        Ok(Json(profile).into_response())
    }

    /// Handle following an author
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let user = authenticate(&headers, &resources.database).await?;
        let author = Self::require_user(&resources, id).await?;
        let params = QueryParams::parse(raw.as_deref());
        let mut errors = FieldErrors::new();
        let recipes_limit = Self::recipes_limit(&params, &mut errors);
        errors.into_result()?;

        resources.database.follows().follow(user.id, author.id).await?;
        info!(user.id = user.id, following.id = author.id, "User subscribed");

        let followed = Self::followed_author(&resources, &author, recipes_limit).await?;
        Ok((StatusCode::CREATED, Json(followed)).into_response())
    }

    /// Handle unfollowing an author
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        id: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let id = path_id(id)?;
        let user = authenticate(&headers, &resources.database).await?;
        let author = Self::require_user(&resources, id).await?;

        resources.database.follows().unfollow(user.id, author.id).await?;
        info!(user.id = user.id, following.id = author.id, "User unsubscribed");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
