// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stove builder.

use std::sync::Arc;
use std::time::Duration;

use crate::config::StoveConfig;
use crate::dispatcher::Dispatcher;
use crate::guard::PowerChangeGuard;
use crate::protocol::Transport;
use crate::session::{AUTO_RELOGIN_PERIOD, SessionManager};
use crate::state::StatusCache;
use crate::stove::Stove;

#[cfg(feature = "http")]
use crate::error::Error;
#[cfg(feature = "http")]
use crate::protocol::{HttpConfig, HttpTransport};
#[cfg(feature = "http")]
use crate::session::AutoRelogin;

/// Builder for [`Stove`]s.
///
/// Building never touches the network; call [`Stove::login`] or
/// [`start`](Self::start) afterwards.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use pellet_stove_lib::{Stove, StoveConfig};
///
/// # fn example() -> pellet_stove_lib::Result<()> {
/// let config = StoveConfig::new("ABC123", "me@example.com", "password");
///
/// let stove = Stove::http(config)
///     .with_cache_ttl(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StoveBuilder {
    config: StoveConfig,
    #[cfg(feature = "http")]
    http: Option<HttpConfig>,
    cache_ttl: Duration,
    swing_window: Duration,
    relogin_period: Duration,
}

impl StoveBuilder {
    pub(crate) fn new(config: StoveConfig) -> Self {
        Self {
            config,
            #[cfg(feature = "http")]
            http: None,
            cache_ttl: StatusCache::DEFAULT_TTL,
            swing_window: PowerChangeGuard::DEFAULT_WINDOW,
            relogin_period: AUTO_RELOGIN_PERIOD,
        }
    }

    /// Uses `http` instead of a configuration derived from the stove config.
    ///
    /// `base_url` and `timeout_secs` from the stove config still override it.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets how long a fetched status is served without a new request.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the minimum interval between two activation changes.
    #[must_use]
    pub fn with_swing_protection_window(mut self, window: Duration) -> Self {
        self.swing_window = window;
        self
    }

    /// Sets the period of the background re-login task.
    #[must_use]
    pub fn with_relogin_period(mut self, period: Duration) -> Self {
        self.relogin_period = period;
        self
    }

    /// Returns the stove configuration.
    #[must_use]
    pub fn config(&self) -> &StoveConfig {
        &self.config
    }

    /// Builds the stove over the given transport.
    ///
    /// The configuration is not validated.
    #[must_use]
    pub fn build_with_transport<P: Transport>(self, transport: P) -> Stove<P> {
        self.build_shared(Arc::new(transport))
    }

    pub(crate) fn build_shared<P: Transport>(self, transport: Arc<P>) -> Stove<P> {
        let session = Arc::new(SessionManager::new(
            Arc::clone(&transport),
            self.config.credentials(),
        ));
        let dispatcher = Dispatcher::new(transport, Arc::clone(&session), self.config.id());

        Stove::new(
            session,
            dispatcher,
            StatusCache::with_ttl(self.cache_ttl),
            PowerChangeGuard::with_window(self.swing_window),
            self.relogin_period,
        )
    }
}

#[cfg(feature = "http")]
impl StoveBuilder {
    /// Builds the stove over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a required field is empty, or
    /// `Error::Protocol` if the HTTP client cannot be created.
    pub fn build(self) -> Result<Stove<HttpTransport>, Error> {
        self.config.validate()?;

        let mut http = self.http.clone().unwrap_or_default();
        if let Some(base_url) = self.config.base_url() {
            http = http.with_base_url(base_url);
        }
        if let Some(timeout) = self.config.timeout() {
            http = http.with_timeout(timeout);
        }

        let transport = http.into_transport()?;
        tracing::debug!(
            device = self.config.id(),
            base_url = transport.base_url(),
            "Built stove"
        );
        Ok(self.build_with_transport(transport))
    }

    /// Builds the stove and starts the re-login task.
    ///
    /// The first log-in runs right away in the background. Must be called
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn start(self) -> Result<(Stove<HttpTransport>, AutoRelogin), Error> {
        let stove = self.build()?;
        let relogin = stove.spawn_auto_relogin();
        Ok((stove, relogin))
    }
}

#[cfg(feature = "http")]
impl Stove<HttpTransport> {
    /// Starts building a stove that talks to the cloud API over HTTPS.
    #[must_use]
    pub fn http(config: StoveConfig) -> StoveBuilder {
        StoveBuilder::new(config)
    }
}
