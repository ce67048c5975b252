// ABOUTME: Re-exports of the unified error types from the core crate
// ABOUTME: Keeps `crate::errors::*` paths stable for handlers and managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! # Unified Error Handling System
//!
//! Error types live in `recipe-share-core` so that they can be shared by
//! every workspace crate. This module re-exports them for convenience.

pub use recipe_share_core::errors::database::DatabaseError;
pub use recipe_share_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails, FieldErrors,
};
