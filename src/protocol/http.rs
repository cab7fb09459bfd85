// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! reqwest-based transport for the stove cloud API.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;

use crate::error::ProtocolError;
use crate::protocol::{HttpRequest, HttpResponse, Transport};

/// User agent sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HttpConfig - Connection parameters for the cloud API
// ============================================================================

/// Configuration for the cloud API HTTP client.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new()
///     .with_base_url("https://stove.example.com")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "https://stove.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl HttpConfig {
    /// Default cloud endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://piazzetta.efesto.web2app.it";
    /// Default request timeout. The service is slow to answer.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration pointing at the default cloud endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    /// Overrides the base URL (scheme and host, no trailing slash needed).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accepts TLS certificates that fail verification.
    ///
    /// The cloud endpoint has historically served an incomplete chain.
    #[must_use]
    pub fn with_insecure_tls(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpTransport` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not http(s) or the client cannot be
    /// created.
    pub fn into_transport(self) -> Result<HttpTransport, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpTransport {
            base_url: self.base_url,
            timeout: self.timeout,
            client,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// HTTP transport backed by reqwest.
///
/// Redirects are never followed and every request carries the library's
/// user agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpTransport {
    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, request: &HttpRequest) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }

    fn map_error(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            ProtocolError::Timeout(millis)
        } else {
            ProtocolError::Http(err)
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ProtocolError> {
        let url = self.build_url(request);

        tracing::debug!(path = %request.path(), "Sending HTTP request");

        let mut builder = self.client.get(&url);
        if let Some(cookie) = request.cookie() {
            builder = builder.header(COOKIE, cookie);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        let body = response.text().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(status, body = %body, "Received HTTP response");

        Ok(HttpResponse::new(status, set_cookies, body))
    }
}
