// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time-bounded status cache.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::Instant;

use crate::error::ParseError;
use crate::response::StatusPayload;

use super::StoveStatus;

/// Holds the last known [`StoveStatus`] and when it was refreshed.
///
/// The cache never talks to the network itself: the stove asks it for a
/// fresh status and, on a miss, fetches a payload and hands it to
/// [`fill`](Self::fill).
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::state::StatusCache;
/// use tokio::time::Instant;
///
/// let mut cache = StatusCache::new();
/// let now = Instant::now();
/// assert!(cache.fresh(now).is_none());
///
/// let payload = serde_json::json!({
///     "deviceStatus": 0, "airTemperature": 18, "lastSetAirTemperature": 20,
///     "realPower": 1, "lastSetPower": 2, "isDeviceInAlarm": 0, "contactStatus": 0
/// });
/// cache.fill(&payload, now).unwrap();
/// assert!(cache.fresh(now).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct StatusCache {
    status: StoveStatus,
    last_refreshed_at: Option<Instant>,
    refreshed_at: Option<DateTime<Utc>>,
    ttl: Duration,
}

impl StatusCache {
    /// Maximum age of a cached status.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

    /// Creates an empty cache with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Self::DEFAULT_TTL)
    }

    /// Creates an empty cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            status: StoveStatus::default(),
            last_refreshed_at: None,
            refreshed_at: None,
            ttl,
        }
    }

    /// Returns the cached status if it is younger than the TTL at `now`.
    #[must_use]
    pub fn fresh(&self, now: Instant) -> Option<&StoveStatus> {
        let refreshed = self.last_refreshed_at?;
        (now < refreshed + self.ttl).then_some(&self.status)
    }

    /// Returns the cached status, fresh or not.
    #[must_use]
    pub fn status(&self) -> &StoveStatus {
        &self.status
    }

    /// Returns when the status was last refreshed, if ever.
    #[must_use]
    pub fn last_refreshed_at(&self) -> Option<Instant> {
        self.last_refreshed_at
    }

    /// Returns the wall-clock time of the last refresh, if ever.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Returns the TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces the cached status with the one carried by `payload`.
    ///
    /// The payload is validated in full before anything is written, so a
    /// malformed payload leaves the previous status untouched. Alarm and
    /// connection problems are logged but do not fail the fill.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the payload is not a valid status.
    pub fn fill(&mut self, payload: &Value, now: Instant) -> Result<&StoveStatus, ParseError> {
        let status = StatusPayload::from_value(payload)?.into_status()?;

        if !status.alarm().is_healthy() {
            tracing::warn!(alarm = %status.alarm(), "Stove alarm is set");
        }
        if !status.connection().is_ok() {
            tracing::warn!(
                connection = %status.connection(),
                "Possible stove WiFi module connection error"
            );
        }

        self.status = status;
        // Never move backwards if an older exchange completes late.
        self.last_refreshed_at = Some(self.last_refreshed_at.map_or(now, |prev| prev.max(now)));
        self.refreshed_at = Some(Utc::now());

        tracing::info!(
            state = %self.status.state(),
            current_temperature = self.status.current_temperature(),
            target_temperature = self.status.target_temperature(),
            target_power = self.status.target_power(),
            "Stove status updated"
        );

        Ok(&self.status)
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new()
    }
}
