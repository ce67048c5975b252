// ABOUTME: Query string parsing for list endpoints with repeatable keys and 1/0 flags
// ABOUTME: Collects malformed values as per-field validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use url::form_urlencoded;

use crate::errors::FieldErrors;
use crate::pagination::PageQuery;

/// Decoded query string keeping every occurrence of every key
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode a raw query string (`None` when the request had none)
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value of `key`
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every non-empty value of `key` in order
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Integer value of `key`; malformed values are recorded against the key
    pub fn int(&self, key: &str, errors: &mut FieldErrors) -> Option<i64> {
        let raw = self.first(key).filter(|v| !v.is_empty())?;
        raw.trim().parse().map_or_else(
            |_| {
                errors.add(key, format!("\"{raw}\" is not an integer"));
                None
            },
            Some,
        )
    }

    /// `1`/`true` or `0`/`false` value of `key`
    pub fn flag(&self, key: &str, errors: &mut FieldErrors) -> Option<bool> {
        match self.first(key)? {
            "1" | "true" | "True" => Some(true),
            "0" | "false" | "False" => Some(false),
            "" => None,
            other => {
                errors.add(key, format!("\"{other}\" is not 1 or 0"));
                None
            }
        }
    }

    /// Raw `limit`/`offset` values
    pub fn page(&self, errors: &mut FieldErrors) -> PageQuery {
        PageQuery {
            limit: self.int("limit", errors),
            offset: self.int("offset", errors),
        }
    }

    /// Pairs to repeat on next/previous links: everything except `limit` and `offset`
    #[must_use]
    pub fn carried_pairs(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter(|(k, _)| k != "limit" && k != "offset")
            .cloned()
            .collect()
    }
}
