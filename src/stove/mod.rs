// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level stove abstraction.
//!
//! A [`Stove`] owns the single session, the dispatcher, the status cache and
//! the power-change guard for one device.
//!
//! ```no_run
//! use pellet_stove_lib::{Stove, StoveConfig};
//! use pellet_stove_lib::types::ActiveState;
//!
//! # async fn example() -> pellet_stove_lib::Result<()> {
//! let config = StoveConfig::new("ABC123", "me@example.com", "password");
//! let (stove, relogin) = Stove::http(config).start()?;
//!
//! // Wait for the first log-in, or let the first calls fail until it lands.
//! stove.login().await?;
//!
//! println!("running state: {}", stove.running_state().await?);
//! stove.set_target_temperature(21).await?;
//! stove.set_active(ActiveState::Active).await?;
//!
//! relogin.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::StoveBuilder;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::command::{ApiMethod, Parameter};
use crate::config::StoveConfig;
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::guard::{GuardDecision, PowerChangeGuard};
use crate::protocol::Transport;
use crate::session::{AutoRelogin, SessionManager, spawn_auto_relogin};
use crate::state::{StatusCache, StoveStatus};
use crate::subscription::{CallbackRegistry, StoveUpdate, SubscriptionId};
use crate::types::{ActiveState, PowerLevel, RunningState, TargetTemperature};

/// Values last applied through this stove.
///
/// These are what an accessory host shows right after a successful `set`,
/// before the next status refresh confirms them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectedState {
    /// Last applied activation.
    pub active: ActiveState,
    /// Last applied target temperature.
    pub target_temperature: TargetTemperature,
    /// Last applied power level.
    pub target_power: PowerLevel,
}

/// A pellet stove controlled through the cloud API.
///
/// # Type Parameter
///
/// `P` is the transport; [`HttpTransport`](crate::protocol::HttpTransport)
/// in production.
pub struct Stove<P: Transport> {
    session: Arc<SessionManager<P>>,
    dispatcher: Dispatcher<P>,
    cache: RwLock<StatusCache>,
    guard: Mutex<PowerChangeGuard>,
    reflected: RwLock<ReflectedState>,
    callbacks: Arc<CallbackRegistry>,
    relogin_period: Duration,
}

impl<P: Transport> Stove<P> {
    /// Creates a stove over `transport`. No request is made.
    #[must_use]
    pub fn with_transport(transport: P, config: &StoveConfig) -> Self {
        StoveBuilder::new(config.clone()).build_with_transport(transport)
    }

    pub(crate) fn new(
        session: Arc<SessionManager<P>>,
        dispatcher: Dispatcher<P>,
        cache: StatusCache,
        guard: PowerChangeGuard,
        relogin_period: Duration,
    ) -> Self {
        Self {
            session,
            dispatcher,
            cache: RwLock::new(cache),
            guard: Mutex::new(guard),
            reflected: RwLock::new(ReflectedState::default()),
            callbacks: Arc::new(CallbackRegistry::new()),
            relogin_period,
        }
    }

    /// Returns the device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        self.dispatcher.device_id()
    }

    /// Returns the session manager.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager<P>> {
        &self.session
    }

    // ========== Session ==========

    /// Logs in once.
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` if the login fails.
    pub async fn login(&self) -> Result<(), Error> {
        self.session.login().await.map(|_| ())
    }

    /// Runs a full re-login sequence. See [`SessionManager::auto_relogin`].
    pub async fn auto_relogin(&self, is_initial: bool) -> bool {
        self.session.auto_relogin(is_initial).await
    }

    /// Starts the background re-login task on the current tokio runtime.
    #[must_use]
    pub fn spawn_auto_relogin(&self) -> AutoRelogin
    where
        P: 'static,
    {
        spawn_auto_relogin(Arc::clone(&self.session), self.relogin_period)
    }

    /// Calls an arbitrary API method.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::call_method`].
    pub async fn call_method(&self, method: &ApiMethod) -> Result<Value, Error> {
        self.dispatcher.call_method(method).await
    }

    // ========== Status ==========

    /// Returns the stove status, refreshing it if the cache is stale.
    ///
    /// # Errors
    ///
    /// Returns error if the refresh fails. The cached status is left as it
    /// was.
    pub async fn status(&self) -> Result<StoveStatus, Error> {
        let cached = self.cache.read().fresh(Instant::now()).cloned();
        if let Some(status) = cached {
            tracing::debug!(state = %status.state(), "Stove status served from cache");
            return Ok(status);
        }

        let payload = self
            .dispatcher
            .call_method(&ApiMethod::GetState)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to get stove status"))?;

        let status = self
            .cache
            .write()
            .fill(&payload, Instant::now())
            .cloned()
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse stove status"))?;

        self.callbacks.dispatch(&StoveUpdate::Status(status.clone()));
        Ok(status)
    }

    /// Returns the cached status without any network activity.
    #[must_use]
    pub fn cached_status(&self) -> StoveStatus {
        self.cache.read().status().clone()
    }

    /// Returns when the cache was last refreshed (monotonic clock).
    #[must_use]
    pub fn last_refreshed_at(&self) -> Option<Instant> {
        self.cache.read().last_refreshed_at()
    }

    /// Returns when the cache was last refreshed (wall clock).
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.cache.read().refreshed_at()
    }

    /// Returns whether the stove is on.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot be refreshed.
    pub async fn active(&self) -> Result<ActiveState, Error> {
        let status = self.status().await?;
        let active = status.derive_active();
        tracing::debug!(
            state = %status.state(),
            connection = %status.connection(),
            alarm = %status.alarm(),
            %active,
            "Derived active state"
        );
        Ok(active)
    }

    /// Returns what the stove is doing.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot be refreshed.
    pub async fn running_state(&self) -> Result<RunningState, Error> {
        let status = self.status().await?;
        let running = status.derive_running_state();
        tracing::debug!(
            state = %status.state(),
            connection = %status.connection(),
            alarm = %status.alarm(),
            %running,
            "Derived running state"
        );
        Ok(running)
    }

    /// Returns the measured air temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot be refreshed.
    pub async fn current_temperature(&self) -> Result<f64, Error> {
        Ok(self.status().await?.current_temperature())
    }

    /// Returns the last-set target temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot be refreshed.
    pub async fn target_temperature(&self) -> Result<f64, Error> {
        Ok(self.status().await?.target_temperature())
    }

    /// Returns the last-set power level.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot be refreshed.
    pub async fn target_power(&self) -> Result<i64, Error> {
        Ok(self.status().await?.target_power())
    }

    // ========== Control ==========

    /// Switches the stove on or off, subject to swing protection.
    ///
    /// Asking for the state the stove is already in succeeds without a
    /// request. A real change within the protection window of the previous
    /// one fails with `Error::Guard`. Activation requests are serialized.
    ///
    /// # Errors
    ///
    /// Returns `Error::Guard` during the cooldown, or the dispatcher error if
    /// the call fails.
    pub async fn set_active(&self, desired: ActiveState) -> Result<(), Error> {
        let mut guard = self.guard.lock().await;

        // The raw phase decides, not the alarm-masked view: a stove in alarm
        // that still burns must remain switchable off.
        let current = self.cache.read().status().state().active();

        match guard.check(current, desired, Instant::now()) {
            Ok(GuardDecision::AlreadyInState) => {
                tracing::debug!(%desired, "Stove already at target state");
                return Ok(());
            }
            Ok(GuardDecision::Proceed) => {}
            Err(e) => {
                tracing::warn!(%desired, error = %e, "Stove power swing protection");
                return Err(e.into());
            }
        }

        let payload = self
            .dispatcher
            .call_method(&ApiMethod::power(desired))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to set stove power"))?;

        guard.record_change(Instant::now());
        drop(guard);

        self.reflected.write().active = desired;
        tracing::info!(%desired, "Set stove power state");
        self.callbacks.dispatch(&StoveUpdate::Active(desired));
        self.fill_from_response(&payload);
        Ok(())
    }

    /// Sets the target temperature, clamped to 7-30 °C.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher error if the call fails.
    pub async fn set_target_temperature(&self, value: i32) -> Result<TargetTemperature, Error> {
        let temperature = TargetTemperature::clamped(value);
        tracing::debug!(requested = value, applied = %temperature, "Setting stove temperature");

        let payload = self
            .dispatcher
            .call_method(&ApiMethod::WriteParameters(Parameter::AirTemperature(
                temperature,
            )))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to set stove heating temp"))?;

        self.reflected.write().target_temperature = temperature;
        tracing::info!(%temperature, "Set stove heating temp");
        self.callbacks
            .dispatch(&StoveUpdate::TargetTemperature(temperature));
        self.fill_from_response(&payload);
        Ok(temperature)
    }

    /// Sets the burner power level, clamped to 1-4.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher error if the call fails.
    pub async fn set_target_power(&self, value: i32) -> Result<PowerLevel, Error> {
        let power = PowerLevel::clamped(value);
        tracing::debug!(requested = value, applied = %power, "Setting stove power level");

        let payload = self
            .dispatcher
            .call_method(&ApiMethod::WriteParameters(Parameter::Power(power)))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to set stove power level"))?;

        self.reflected.write().target_power = power;
        tracing::info!(%power, "Set stove power level");
        self.callbacks.dispatch(&StoveUpdate::TargetPower(power));
        self.fill_from_response(&payload);
        Ok(power)
    }

    /// Returns the values last applied through this stove.
    #[must_use]
    pub fn reflected(&self) -> ReflectedState {
        *self.reflected.read()
    }

    /// Returns the time since the last applied activation change.
    pub async fn since_last_power_change(&self) -> Option<Duration> {
        let last = self.guard.lock().await.last_change_at()?;
        Some(Instant::now().saturating_duration_since(last))
    }

    // ========== Subscriptions ==========

    /// Registers a callback for every applied change and fresh status.
    pub fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StoveUpdate) + Send + Sync + 'static,
    {
        self.callbacks.on_update(callback)
    }

    /// Removes a callback. Returns false if the ID was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    /// Uses a mutating call's answer as a status refresh when it is one.
    fn fill_from_response(&self, payload: &Value) {
        let filled = self.cache.write().fill(payload, Instant::now()).cloned();
        match filled {
            Ok(status) => {
                tracing::debug!("Filled stove status from command result");
                self.callbacks.dispatch(&StoveUpdate::Status(status));
            }
            Err(e) => tracing::debug!(error = %e, "Command result is not a status"),
        }
    }
}

impl<P: Transport> std::fmt::Debug for Stove<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stove")
            .field("device_id", &self.device_id())
            .field("authenticated", &self.session.is_authenticated())
            .field("reflected", &self.reflected())
            .finish_non_exhaustive()
    }
}
