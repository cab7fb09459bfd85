// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last known stove status.

use crate::types::{ActiveState, AlarmCode, ConnectionCode, RunningState, StoveState};

/// Snapshot of the stove as reported by the cloud API.
///
/// Before the first successful refresh the status holds start-up defaults:
/// stove off, 0 °C measured, 7 °C target, power 1.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::state::StoveStatus;
/// use pellet_stove_lib::types::{ActiveState, AlarmCode, ConnectionCode, RunningState, StoveState};
///
/// let status = StoveStatus::new(
///     StoveState::Working,
///     20.0,
///     22.0,
///     3,
///     3,
///     AlarmCode::OK,
///     ConnectionCode::OK,
/// );
/// assert_eq!(status.derive_active(), ActiveState::Active);
/// assert_eq!(status.derive_running_state(), RunningState::Heating);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoveStatus {
    state: StoveState,
    current_temperature: f64,
    target_temperature: f64,
    current_power: i64,
    target_power: i64,
    alarm: AlarmCode,
    connection: ConnectionCode,
}

impl StoveStatus {
    /// Creates a status from its parts.
    #[must_use]
    pub fn new(
        state: StoveState,
        current_temperature: f64,
        target_temperature: f64,
        current_power: i64,
        target_power: i64,
        alarm: AlarmCode,
        connection: ConnectionCode,
    ) -> Self {
        Self {
            state,
            current_temperature,
            target_temperature,
            current_power,
            target_power,
            alarm,
            connection,
        }
    }

    /// Raw operating phase.
    #[must_use]
    pub fn state(&self) -> StoveState {
        self.state
    }

    /// Measured air temperature.
    #[must_use]
    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    /// Last-set target air temperature.
    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    /// Power the burner is actually running at.
    #[must_use]
    pub fn current_power(&self) -> i64 {
        self.current_power
    }

    /// Last-set power level.
    #[must_use]
    pub fn target_power(&self) -> i64 {
        self.target_power
    }

    /// Alarm code.
    #[must_use]
    pub fn alarm(&self) -> AlarmCode {
        self.alarm
    }

    /// WiFi module connection code.
    #[must_use]
    pub fn connection(&self) -> ConnectionCode {
        self.connection
    }

    /// On/off state as seen by the user.
    ///
    /// Reported inactive whenever the module is disconnected or a real alarm
    /// is raised, whatever the raw phase says.
    #[must_use]
    pub fn derive_active(&self) -> ActiveState {
        if self.connection.is_ok() && self.alarm.is_healthy() {
            self.state.active()
        } else {
            ActiveState::Inactive
        }
    }

    /// Running state as seen by the user.
    ///
    /// Reported inactive whenever the module is disconnected.
    #[must_use]
    pub fn derive_running_state(&self) -> RunningState {
        if self.connection.is_ok() {
            self.state.running()
        } else {
            RunningState::Inactive
        }
    }
}

impl Default for StoveStatus {
    fn default() -> Self {
        Self {
            state: StoveState::Off,
            current_temperature: 0.0,
            target_temperature: 7.0,
            current_power: 1,
            target_power: 1,
            alarm: AlarmCode::OK,
            connection: ConnectionCode::OK,
        }
    }
}
