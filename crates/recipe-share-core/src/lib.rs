// ABOUTME: Core types and constants for the recipe sharing server
// ABOUTME: Foundation crate with error handling, domain models, pagination, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # Recipe Share Core
//!
//! Foundation crate providing shared types and constants for the recipe
//! sharing server. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and field-level validation errors
//! - **constants**: Limits, measurement units, and shopping list formatting constants
//! - **models**: Users, tags, ingredients, recipes, and the association records between them
//! - **pagination**: Limit/offset pagination parameters and page envelopes

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (User, Recipe, Ingredient, Tag, Follow, etc.)
pub mod models;

/// Limit/offset pagination for list endpoints
pub mod pagination;
