// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stove configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::Error;
use crate::session::Credentials;

/// Configuration for one stove, as supplied by the accessory host.
///
/// Only presence of the fields is checked.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::config::StoveConfig;
///
/// let config = StoveConfig::from_json(r#"{
///     "name": "Living room stove",
///     "id": "ABC123",
///     "login": "me@example.com",
///     "password": "hunter2"
/// }"#).unwrap();
///
/// assert_eq!(config.id(), "ABC123");
/// assert!(config.base_url().is_none());
///
/// // Or built directly
/// let config = StoveConfig::new("ABC123", "me@example.com", "hunter2")
///     .with_name("Living room stove");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct StoveConfig {
    id: String,
    login: String,
    password: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default, rename = "timeout_secs", deserialize_with = "timeout_from_secs")]
    timeout: Option<Duration>,
}

fn timeout_from_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl StoveConfig {
    /// Display name used when none is configured.
    pub const DEFAULT_NAME: &'static str = "HeaterCoolerPiazzettaStoveSimple";

    /// Creates a configuration from the required fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            login: login.into(),
            password: password.into(),
            name: None,
            base_url: None,
            timeout: None,
        }
    }

    /// Parses the JSON object handed over by the accessory host.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed or a required field
    /// is missing or empty.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the cloud endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first empty field, or if the
    /// timeout override is zero.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("id", &self.id),
            ("login", &self.login),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("missing {field}")));
            }
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Device id (also the accessory serial number).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Account login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Display name, falling back to [`DEFAULT_NAME`](Self::DEFAULT_NAME).
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::DEFAULT_NAME)
    }

    /// Cloud endpoint override.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Request timeout override.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the account credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.login.as_str(), self.password.as_str())
    }
}

impl fmt::Debug for StoveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoveConfig")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config =
            StoveConfig::from_json(r#"{"id": "A1", "login": "me", "password": "pw"}"#).unwrap();
        assert_eq!(config.id(), "A1");
        assert_eq!(config.login(), "me");
        assert_eq!(config.name(), StoveConfig::DEFAULT_NAME);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = StoveConfig::from_json(
            r#"{"accessory": "HeaterCoolerPiazzettaStoveSimple", "name": "Stove",
                "id": "A1", "login": "me", "password": "pw",
                "base_url": "http://localhost:8080", "timeout_secs": 3}"#,
        )
        .unwrap();
        assert_eq!(config.name(), "Stove");
        assert_eq!(config.base_url(), Some("http://localhost:8080"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn missing_field_is_config_error() {
        let err = StoveConfig::from_json(r#"{"id": "A1", "login": "me"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("password")));
    }

    #[test]
    fn empty_field_is_config_error() {
        let err =
            StoveConfig::from_json(r#"{"id": " ", "login": "me", "password": "pw"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m == "missing id"));
    }

    #[test]
    fn sub_second_timeout_is_kept() {
        let config = StoveConfig::new("A1", "me", "pw").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_config_error() {
        let err = StoveConfig::from_json(
            r#"{"id": "A1", "login": "me", "password": "pw", "timeout_secs": 0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("timeout")));

        let config = StoveConfig::new("A1", "me", "pw").with_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn debug_redacts_password() {
        let debug = format!("{:?}", StoveConfig::new("A1", "me", "secret"));
        assert!(!debug.contains("secret"));
    }
}
