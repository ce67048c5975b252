// ABOUTME: Re-exports pagination types from recipe-share-core and builds absolute page URLs
// ABOUTME: Produces the next/previous links of limit/offset page envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

pub use recipe_share_core::pagination::*;

use url::Url;

use crate::errors::{AppError, AppResult};

/// Absolute URL builder for one list endpoint
#[derive(Debug, Clone)]
pub struct PageLinks {
    endpoint: Url,
    extra: Vec<(String, String)>,
}

impl PageLinks {
    /// Links for `path` below `base_url`, repeating `extra` query pairs on every link
    ///
    /// # Errors
    ///
    /// Returns an internal error if the combined URL does not parse
    pub fn new(base_url: &str, path: &str, extra: Vec<(String, String)>) -> AppResult<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| AppError::internal(format!("Invalid page URL {base_url}{path}: {e}")))?;
        Ok(Self { endpoint, extra })
    }

    /// URL of the page starting at `offset`; offset 0 is omitted
    #[must_use]
    pub fn at(&self, limit: i64, offset: i64) -> String {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.extend_pairs(&self.extra);
            pairs.append_pair("limit", &limit.to_string());
            if offset > 0 {
                pairs.append_pair("offset", &offset.to_string());
            }
        }
        url.into()
    }

    /// Wrap one page of results in the list envelope
    #[must_use]
    pub fn page<T>(&self, results: Vec<T>, total: i64, params: PageParams) -> Page<T> {
        Page {
            count: total,
            next: params
                .next_offset(total)
                .map(|offset| self.at(params.limit, offset)),
            previous: params
                .previous_offset()
                .map(|offset| self.at(params.limit, offset)),
            results,
        }
    }
}
