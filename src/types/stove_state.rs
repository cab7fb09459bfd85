// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw stove operating phases and the states derived from them.

use std::fmt;

use crate::error::ParseError;

/// Operating phase reported by the stove firmware (`deviceStatus`).
///
/// The cloud API reports one of eight raw codes. Every code maps to exactly
/// one [`ActiveState`] and one [`RunningState`].
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::types::{ActiveState, RunningState, StoveState};
///
/// let state = StoveState::from_code(4).unwrap();
/// assert_eq!(state, StoveState::Working);
/// assert_eq!(state.active(), ActiveState::Active);
/// assert_eq!(state.running(), RunningState::Heating);
///
/// assert!(StoveState::from_code(8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoveState {
    /// Stove is off (also reported after an error shutdown).
    #[default]
    Off,
    /// Stove is shutting down, or waiting for the flame.
    TurningOff,
    /// Transitional phase with no documented name (code 2).
    Phase2,
    /// Ignition in progress.
    Lighting,
    /// Burning and heating.
    Working,
    /// Transitional phase with no documented name (code 5).
    Phase5,
    /// Final cleaning cycle.
    FinalCleaning,
    /// Standby, ready to relight.
    Standby,
}

impl StoveState {
    /// Every known state, in code order.
    pub const ALL: [Self; 8] = [
        Self::Off,
        Self::TurningOff,
        Self::Phase2,
        Self::Lighting,
        Self::Working,
        Self::Phase5,
        Self::FinalCleaning,
        Self::Standby,
    ];

    /// Decodes a raw `deviceStatus` code.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for codes outside 0-7.
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            0 => Ok(Self::Off),
            1 => Ok(Self::TurningOff),
            2 => Ok(Self::Phase2),
            3 => Ok(Self::Lighting),
            4 => Ok(Self::Working),
            5 => Ok(Self::Phase5),
            6 => Ok(Self::FinalCleaning),
            7 => Ok(Self::Standby),
            _ => Err(ParseError::InvalidValue {
                field: "deviceStatus".to_string(),
                message: format!("unknown stove state code {code}"),
            }),
        }
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::TurningOff => 1,
            Self::Phase2 => 2,
            Self::Lighting => 3,
            Self::Working => 4,
            Self::Phase5 => 5,
            Self::FinalCleaning => 6,
            Self::Standby => 7,
        }
    }

    /// Maps the raw phase to on/off, ignoring alarm and connection.
    #[must_use]
    pub const fn active(self) -> ActiveState {
        match self {
            Self::Off => ActiveState::Inactive,
            Self::TurningOff
            | Self::Phase2
            | Self::Lighting
            | Self::Working
            | Self::Phase5
            | Self::FinalCleaning
            | Self::Standby => ActiveState::Active,
        }
    }

    /// Maps the raw phase to a running state, ignoring connection.
    #[must_use]
    pub const fn running(self) -> RunningState {
        match self {
            Self::Off => RunningState::Inactive,
            Self::Working => RunningState::Heating,
            Self::TurningOff
            | Self::Phase2
            | Self::Lighting
            | Self::Phase5
            | Self::FinalCleaning
            | Self::Standby => RunningState::Idle,
        }
    }
}

impl fmt::Display for StoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::TurningOff => "turning off",
            Self::Phase2 => "phase 2",
            Self::Lighting => "lighting",
            Self::Working => "working",
            Self::Phase5 => "phase 5",
            Self::FinalCleaning => "final cleaning",
            Self::Standby => "standby",
        };
        write!(f, "{name} ({})", self.code())
    }
}

/// Whether the stove is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveState {
    /// Switched off.
    #[default]
    Inactive,
    /// Switched on.
    Active,
}

impl ActiveState {
    /// Returns the accessory characteristic value (0 or 1).
    #[must_use]
    pub const fn as_num(self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    /// Decodes an accessory characteristic value.
    #[must_use]
    pub const fn from_num(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Inactive),
            1 => Some(Self::Active),
            _ => None,
        }
    }
}

impl From<bool> for ActiveState {
    fn from(value: bool) -> Self {
        if value { Self::Active } else { Self::Inactive }
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// What the stove is currently doing, as a heater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunningState {
    /// Not running.
    #[default]
    Inactive,
    /// Powered but not producing heat.
    Idle,
    /// Producing heat.
    Heating,
}

impl RunningState {
    /// Returns the accessory characteristic value (0, 1 or 2).
    #[must_use]
    pub const fn as_num(self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Idle => 1,
            Self::Heating => 2,
        }
    }
}

impl fmt::Display for RunningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Idle => write!(f, "IDLE"),
            Self::Heating => write!(f, "HEATING"),
        }
    }
}
