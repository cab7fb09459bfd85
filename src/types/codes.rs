// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alarm and connection codes reported alongside the stove state.

use std::fmt;

/// Alarm code reported in `isDeviceInAlarm`.
///
/// Only [`AlarmCode::OK`] and [`AlarmCode::AWAITING_FLAME`] are considered
/// healthy; any other value is a fault.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::types::AlarmCode;
///
/// assert!(AlarmCode::OK.is_healthy());
/// assert!(AlarmCode::AWAITING_FLAME.is_healthy());
/// assert!(!AlarmCode::new(7).is_healthy());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlarmCode(i64);

impl AlarmCode {
    /// No alarm.
    pub const OK: Self = Self(0);
    /// The stove is waiting for the flame to catch.
    pub const AWAITING_FLAME: Self = Self(32);

    /// Wraps a raw code.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns true if the code is not a fault.
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        self.0 == Self::OK.0 || self.0 == Self::AWAITING_FLAME.0
    }
}

impl fmt::Display for AlarmCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection code of the stove's WiFi module, reported in `contactStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConnectionCode(i64);

impl ConnectionCode {
    /// The module is reachable.
    pub const OK: Self = Self(0);

    /// Wraps a raw code.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns true if the cloud can talk to the stove.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }
}

impl fmt::Display for ConnectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
