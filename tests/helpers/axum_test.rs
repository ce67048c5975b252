// ABOUTME: In-process HTTP client for driving the recipe router in integration tests
// ABOUTME: Builds requests with the forwarded-user header and decodes error envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use axum::body::{to_bytes, Body, Bytes};
use axum::http::request::Builder;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use recipe_share_server::auth::AUTHENTICATED_USER_HEADER;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

/// One request against the router, sent with `tower::ServiceExt::oneshot`
pub struct AxumTestRequest {
    builder: Builder,
    body: Body,
}

impl AxumTestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            builder: Request::builder().method(method).uri(uri),
            body: Body::empty(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn patch(uri: &str) -> Self {
        Self::new(Method::PATCH, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Forward `user_id` the way the upstream auth layer does
    pub fn as_user(self, user_id: i64) -> Self {
        self.header(AUTHENTICATED_USER_HEADER, &user_id.to_string())
    }

    /// Serialize `data` as the JSON request body
    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        let encoded = serde_json::to_vec(data).expect("serializable request body");
        self.body = Body::from(encoded);
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    pub async fn send(self, app: Router) -> AxumTestResponse {
        let request = self.builder.body(self.body).expect("valid request");
        let response = app.oneshot(request).await.expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable response body");
        AxumTestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Fully buffered response
pub struct AxumTestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl AxumTestResponse {
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response is not the expected JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(self) -> String {
        String::from_utf8(self.body.to_vec()).expect("UTF-8 response body")
    }

    /// The `error.code` of an error envelope
    pub fn error_code(self) -> String {
        let body: Value = self.json();
        body["error"]["code"]
            .as_str()
            .unwrap_or_else(|| panic!("no error envelope in {body}"))
            .to_owned()
    }

    /// Fields named in `error.details.fields`
    pub fn field_errors(self) -> Vec<String> {
        let body: Value = self.json();
        body["error"]["details"]["fields"]
            .as_object()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Panic with the body if the status differs
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }
}
