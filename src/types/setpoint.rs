// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoints accepted by the stove.
//!
//! Out-of-range requests are clamped into the supported range rather than
//! rejected, so every constructor here is infallible.

use std::fmt;

/// Target air temperature in degrees Celsius (7-30).
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::types::TargetTemperature;
///
/// assert_eq!(TargetTemperature::clamped(21).value(), 21);
/// assert_eq!(TargetTemperature::clamped(100).value(), 30);
/// assert_eq!(TargetTemperature::clamped(-5).value(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetTemperature(u8);

impl TargetTemperature {
    /// Lowest settable temperature.
    pub const MIN: u8 = 7;
    /// Highest settable temperature.
    pub const MAX: u8 = 30;

    /// Clamps `value` into `MIN..=MAX`.
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        let clamped = value.clamp(i32::from(Self::MIN), i32::from(Self::MAX));
        // In range after clamping.
        Self(u8::try_from(clamped).unwrap_or(Self::MIN))
    }

    /// Returns the temperature.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for TargetTemperature {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Burner power level (1-4).
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::types::PowerLevel;
///
/// assert_eq!(PowerLevel::clamped(3).value(), 3);
/// assert_eq!(PowerLevel::clamped(9).value(), 4);
/// assert_eq!(PowerLevel::clamped(0).value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PowerLevel(u8);

impl PowerLevel {
    /// Lowest power level.
    pub const MIN: u8 = 1;
    /// Highest power level.
    pub const MAX: u8 = 4;

    /// Clamps `value` into `MIN..=MAX`.
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        let clamped = value.clamp(i32::from(Self::MIN), i32::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::MIN))
    }

    /// Returns the power level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for PowerLevel {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
