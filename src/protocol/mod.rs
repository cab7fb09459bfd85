// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction for talking to the stove cloud API.
//!
//! The session manager and the dispatcher only need to perform a `GET`
//! request and look at the status code, the `Set-Cookie` headers and the
//! body. That capability is captured by the [`Transport`] trait so that the
//! HTTP stack can be swapped out (or faked in tests).
//!
//! # Implementations
//!
//! - [`HttpTransport`]: reqwest-based client (requires the `http` feature)

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTransport};

use std::future::Future;

use crate::error::ProtocolError;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE_NAME: &str = "remember";

/// A `GET` request against the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    path: String,
    query: Vec<(String, String)>,
    cookie: Option<String>,
}

impl HttpRequest {
    /// Creates a request for the given path with no query and no cookie.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            cookie: None,
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attaches the session token as the `remember` cookie.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.cookie = Some(format!("{TOKEN_COOKIE_NAME}={token}"));
        self
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the value of a query parameter, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `Cookie` header value, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Builds the path and percent-encoded query string.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }
}

/// What the core needs from an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    set_cookies: Vec<String>,
    body: String,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, set_cookies: Vec<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            set_cookies,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns every `Set-Cookie` header value, in order.
    #[must_use]
    pub fn set_cookies(&self) -> &[String] {
        &self.set_cookies
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true for 2xx responses and for the 302 the API answers with.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        (200..300).contains(&self.status) || self.status == 302
    }
}

/// Capability to perform `GET` requests against the remote API.
///
/// Implementations must not follow redirects: the login response carries
/// its session cookie on the redirect itself.
pub trait Transport: Send + Sync {
    /// Performs the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be sent or times out.
    fn get(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ProtocolError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_query_encodes_values() {
        let request = HttpRequest::get("/en/ajax/action/frontend/response/ajax/")
            .with_query("device", "ABC123")
            .with_query("method", "write-parameters-queue")
            .with_query("params", "set-power=3");
        assert_eq!(
            request.path_and_query(),
            "/en/ajax/action/frontend/response/ajax/?device=ABC123&method=write-parameters-queue&params=set-power%3D3"
        );
    }

    #[test]
    fn path_without_query() {
        assert_eq!(HttpRequest::get("/en/login/").path_and_query(), "/en/login/");
    }

    #[test]
    fn token_becomes_remember_cookie() {
        let request = HttpRequest::get("/").with_token("abc");
        assert_eq!(request.cookie(), Some("remember=abc"));
    }

    #[test]
    fn query_value_lookup() {
        let request = HttpRequest::get("/").with_query("method", "get-state");
        assert_eq!(request.query_value("method"), Some("get-state"));
        assert_eq!(request.query_value("params"), None);
    }

    #[test]
    fn accepted_statuses() {
        assert!(HttpResponse::new(200, vec![], "").is_accepted());
        assert!(HttpResponse::new(204, vec![], "").is_accepted());
        assert!(HttpResponse::new(302, vec![], "").is_accepted());
        assert!(!HttpResponse::new(301, vec![], "").is_accepted());
        assert!(!HttpResponse::new(500, vec![], "").is_accepted());
    }
}
