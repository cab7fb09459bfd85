// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for stove state and setpoints.
//!
//! These types make invalid values unrepresentable: raw state codes decode
//! into an eight-variant enum, and setpoints are clamped on construction.

mod codes;
mod setpoint;
mod stove_state;

pub use codes::{AlarmCode, ConnectionCode};
pub use setpoint::{PowerLevel, TargetTemperature};
pub use stove_state::{ActiveState, RunningState, StoveState};
