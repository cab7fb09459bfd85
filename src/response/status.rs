// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stove status payload parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::state::StoveStatus;
use crate::types::{AlarmCode, ConnectionCode, StoveState};

/// Status payload returned in the `message` of a `get-state` call.
///
/// The payload also shows up in the answer to `heater-on`/`heater-off`.
/// Unknown keys are ignored.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::response::StatusPayload;
/// use pellet_stove_lib::types::StoveState;
///
/// let json = serde_json::json!({
///     "deviceStatus": 4,
///     "airTemperature": 20.5,
///     "lastSetAirTemperature": 22,
///     "realPower": 3,
///     "lastSetPower": 3,
///     "isDeviceInAlarm": 0,
///     "contactStatus": 0
/// });
/// let status = StatusPayload::from_value(&json).unwrap().into_status().unwrap();
/// assert_eq!(status.state(), StoveState::Working);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    device_status: i64,
    air_temperature: f64,
    last_set_air_temperature: f64,
    real_power: i64,
    last_set_power: i64,
    is_device_in_alarm: i64,
    contact_status: i64,
}

impl StatusPayload {
    /// Parses a payload from an already-decoded JSON message.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if a field is missing or has the wrong type.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        Self::deserialize(value).map_err(ParseError::Json)
    }

    /// Converts the payload into a validated status.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the state code is unknown.
    pub fn into_status(self) -> Result<StoveStatus, ParseError> {
        Ok(StoveStatus::new(
            StoveState::from_code(self.device_status)?,
            self.air_temperature,
            self.last_set_air_temperature,
            self.real_power,
            self.last_set_power,
            AlarmCode::new(self.is_device_in_alarm),
            ConnectionCode::new(self.contact_status),
        ))
    }
}
