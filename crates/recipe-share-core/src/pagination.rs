// ABOUTME: Limit/offset pagination parameters and page envelopes
// ABOUTME: Normalizes client-supplied limits and shapes paginated list responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use serde::{Deserialize, Serialize};

/// Default page size when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 6;

/// Upper bound for any requested page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Requested number of items
    pub limit: Option<i64>,
    /// Number of items to skip
    pub offset: Option<i64>,
}

/// Normalized pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// Number of items to return (1..=max)
    pub limit: i64,
    /// Number of items to skip (>= 0)
    pub offset: i64,
}

impl PageParams {
    /// Clamp a raw query into a valid window
    #[must_use]
    pub fn from_query(query: PageQuery, default_limit: i64, max_limit: i64) -> Self {
        let limit = query
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(max_limit);
        let offset = query.offset.unwrap_or(0).max(0);
        Self { limit, offset }
    }

    /// Offset of the following page, if any item remains after this one
    #[must_use]
    pub const fn next_offset(&self, total: i64) -> Option<i64> {
        match self.offset.checked_add(self.limit) {
            Some(next) if next < total => Some(next),
            _ => None,
        }
    }

    /// Offset of the preceding page, if this is not the first page
    #[must_use]
    pub fn previous_offset(&self) -> Option<i64> {
        if self.offset > 0 {
            Some((self.offset - self.limit).max(0))
        } else {
            None
        }
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items
    pub count: i64,
    /// Absolute URL of the next page
    pub next: Option<String>,
    /// Absolute URL of the previous page
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}
