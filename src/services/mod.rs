// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Shopping list aggregation, short link allocation, and validated recipe writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Domain service layer
//!
//! Business rules that do not belong to a single table live here so that
//! route handlers stay thin and binaries can reuse the same logic.

/// Recipe create/update validation and transactional writes
pub mod recipes;

/// Cart aggregation into a plain-text shopping list
pub mod shopping_list;

/// Short link token allocation and resolution
pub mod short_links;
