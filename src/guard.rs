// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power swing protection.
//!
//! Switching a pellet stove on and off in quick succession damages its
//! combustion cycle. [`PowerChangeGuard`] decides whether an activation
//! request may reach the stove:
//!
//! 1. a request for the state the stove is already in is a no-op
//! 2. a real change within the cooldown window of the previous one is refused
//! 3. anything else may be sent, and is recorded once it succeeds

use std::time::Duration;

use tokio::time::Instant;

use crate::error::GuardError;
use crate::types::ActiveState;

/// Outcome of [`PowerChangeGuard::check`] when the request is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The stove is already in the requested state; nothing to send.
    AlreadyInState,
    /// The change may be sent to the stove.
    Proceed,
}

/// Tracks the last applied activation change.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::guard::{GuardDecision, PowerChangeGuard};
/// use pellet_stove_lib::types::ActiveState;
/// use tokio::time::Instant;
///
/// let mut guard = PowerChangeGuard::new();
/// let now = Instant::now();
///
/// let decision = guard.check(ActiveState::Inactive, ActiveState::Active, now).unwrap();
/// assert_eq!(decision, GuardDecision::Proceed);
/// guard.record_change(now);
///
/// // Switching back right away is refused.
/// assert!(guard.check(ActiveState::Active, ActiveState::Inactive, now).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PowerChangeGuard {
    last_change_at: Option<Instant>,
    window: Duration,
}

impl PowerChangeGuard {
    /// Minimum time between two activation changes.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

    /// Creates a guard with the default 60 minute window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    /// Creates a guard with a custom window.
    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            last_change_at: None,
            window,
        }
    }

    /// Returns the cooldown window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns when the last change was applied, if ever.
    #[must_use]
    pub fn last_change_at(&self) -> Option<Instant> {
        self.last_change_at
    }

    /// Decides whether moving from `current` to `desired` is allowed at `now`.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Cooldown` if a change was applied no more than
    /// one window ago.
    pub fn check(
        &self,
        current: ActiveState,
        desired: ActiveState,
        now: Instant,
    ) -> Result<GuardDecision, GuardError> {
        if current == desired {
            return Ok(GuardDecision::AlreadyInState);
        }

        if let Some(last) = self.last_change_at {
            let elapsed = now.saturating_duration_since(last);
            if elapsed <= self.window {
                return Err(GuardError::Cooldown {
                    elapsed,
                    window: self.window,
                });
            }
        }

        Ok(GuardDecision::Proceed)
    }

    /// Records a successfully applied change.
    pub fn record_change(&mut self, now: Instant) {
        self.last_change_at = Some(now);
    }
}

impl Default for PowerChangeGuard {
    fn default() -> Self {
        Self::new()
    }
}
