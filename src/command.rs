// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote API method definitions.
//!
//! Every call to the cloud frontend endpoint names a method and, for writes,
//! a single `key=value` parameter.
//!
//! | Method | Purpose | Parameter |
//! |--------|---------|-----------|
//! | `get-state` | Read the full stove status | - |
//! | `heater-on` | Switch the stove on | - |
//! | `heater-off` | Switch the stove off | - |
//! | `write-parameters-queue` | Change a setpoint | `set-air-temperature=<n>` or `set-power=<n>` |
//!
//! # Examples
//!
//! ```
//! use pellet_stove_lib::command::{ApiMethod, Parameter};
//! use pellet_stove_lib::types::PowerLevel;
//!
//! let method = ApiMethod::WriteParameters(Parameter::Power(PowerLevel::clamped(3)));
//! assert_eq!(method.name(), "write-parameters-queue");
//! assert_eq!(method.params(), Some("set-power=3".to_string()));
//! ```

use std::fmt;

use crate::types::{ActiveState, PowerLevel, TargetTemperature};

/// A method understood by the cloud frontend endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// Read the stove status.
    GetState,
    /// Switch the stove on.
    HeaterOn,
    /// Switch the stove off.
    HeaterOff,
    /// Queue a setpoint change.
    WriteParameters(Parameter),
}

impl ApiMethod {
    /// Returns the power method that moves the stove to `state`.
    #[must_use]
    pub const fn power(state: ActiveState) -> Self {
        match state {
            ActiveState::Active => Self::HeaterOn,
            ActiveState::Inactive => Self::HeaterOff,
        }
    }

    /// Returns the method name sent in the `method` query parameter.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetState => "get-state",
            Self::HeaterOn => "heater-on",
            Self::HeaterOff => "heater-off",
            Self::WriteParameters(_) => "write-parameters-queue",
        }
    }

    /// Returns the value of the `params` query parameter, if any.
    #[must_use]
    pub fn params(&self) -> Option<String> {
        match self {
            Self::WriteParameters(parameter) => Some(parameter.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params() {
            Some(params) => write!(f, "{} ({params})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// A setpoint written through `write-parameters-queue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Target air temperature.
    AirTemperature(TargetTemperature),
    /// Burner power level.
    Power(PowerLevel),
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AirTemperature(t) => write!(f, "set-air-temperature={t}"),
            Self::Power(p) => write!(f, "set-power={p}"),
        }
    }
}
