// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heater-cooler characteristics and their value ranges.

use std::fmt;

use crate::error::ValueError;
use crate::types::{PowerLevel, TargetTemperature};

/// `TargetHeaterCoolerState` value for heating.
pub const TARGET_STATE_HEAT: i64 = 1;

/// `LockPhysicalControls` value for unlocked controls.
pub const CONTROL_LOCK_DISABLED: i64 = 0;

/// `SwingMode` value for no swing.
pub const SWING_DISABLED: i64 = 0;

/// `TemperatureDisplayUnits` value for Celsius.
pub const UNITS_CELSIUS: i64 = 0;

/// A characteristic of the heater-cooler service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// On/off, writable.
    Active,
    /// Inactive, idle or heating. Read-only.
    CurrentHeaterCoolerState,
    /// Locked to heat.
    TargetHeaterCoolerState,
    /// Measured air temperature. Read-only.
    CurrentTemperature,
    /// Target temperature, writable.
    HeatingThresholdTemperature,
    /// Power level, writable.
    RotationSpeed,
    /// Locked to disabled.
    LockPhysicalControls,
    /// Locked to disabled.
    SwingMode,
    /// Locked to Celsius.
    TemperatureDisplayUnits,
}

impl Characteristic {
    /// Every characteristic of the service.
    pub const ALL: [Self; 9] = [
        Self::Active,
        Self::CurrentHeaterCoolerState,
        Self::TargetHeaterCoolerState,
        Self::CurrentTemperature,
        Self::HeatingThresholdTemperature,
        Self::RotationSpeed,
        Self::LockPhysicalControls,
        Self::SwingMode,
        Self::TemperatureDisplayUnits,
    ];

    /// Returns the characteristic's name as accessory hosts spell it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::CurrentHeaterCoolerState => "CurrentHeaterCoolerState",
            Self::TargetHeaterCoolerState => "TargetHeaterCoolerState",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::HeatingThresholdTemperature => "HeatingThresholdTemperature",
            Self::RotationSpeed => "RotationSpeed",
            Self::LockPhysicalControls => "LockPhysicalControls",
            Self::SwingMode => "SwingMode",
            Self::TemperatureDisplayUnits => "TemperatureDisplayUnits",
        }
    }

    /// Returns true if the characteristic can never be written.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::CurrentHeaterCoolerState | Self::CurrentTemperature
        )
    }

    /// Returns the value the characteristic is locked to, if any.
    #[must_use]
    pub const fn fixed_value(self) -> Option<i64> {
        match self {
            Self::TargetHeaterCoolerState => Some(TARGET_STATE_HEAT),
            Self::LockPhysicalControls => Some(CONTROL_LOCK_DISABLED),
            Self::SwingMode => Some(SWING_DISABLED),
            Self::TemperatureDisplayUnits => Some(UNITS_CELSIUS),
            _ => None,
        }
    }

    /// Returns the range advertised to the accessory host.
    #[must_use]
    pub fn props(self) -> CharacteristicProps {
        match self {
            Self::Active => CharacteristicProps::discrete(&[0, 1]),
            Self::CurrentHeaterCoolerState => CharacteristicProps::discrete(&[0, 1, 2]),
            Self::CurrentTemperature => CharacteristicProps::range(0, 50, 1),
            Self::HeatingThresholdTemperature => CharacteristicProps::range(
                i64::from(TargetTemperature::MIN),
                i64::from(TargetTemperature::MAX),
                1,
            ),
            Self::RotationSpeed => CharacteristicProps::range(
                i64::from(PowerLevel::MIN),
                i64::from(PowerLevel::MAX),
                1,
            ),
            Self::TargetHeaterCoolerState
            | Self::LockPhysicalControls
            | Self::SwingMode
            | Self::TemperatureDisplayUnits => {
                let locked = self.fixed_value().unwrap_or_default();
                CharacteristicProps::discrete(&[locked])
            }
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value range of a characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicProps {
    /// Lowest value.
    pub min: i64,
    /// Highest value.
    pub max: i64,
    /// Smallest increment.
    pub step: i64,
    /// Accepted values, when the characteristic is an enumeration.
    pub valid_values: Option<Vec<i64>>,
}

impl CharacteristicProps {
    fn range(min: i64, max: i64, step: i64) -> Self {
        Self {
            min,
            max,
            step,
            valid_values: None,
        }
    }

    fn discrete(values: &[i64]) -> Self {
        Self {
            min: values.iter().copied().min().unwrap_or_default(),
            max: values.iter().copied().max().unwrap_or_default(),
            step: 1,
            valid_values: Some(values.to_vec()),
        }
    }

    /// Returns true if `value` lies in the range, or among the valid values.
    #[must_use]
    pub fn accepts(&self, value: i64) -> bool {
        match &self.valid_values {
            Some(values) => values.contains(&value),
            None => (self.min..=self.max).contains(&value),
        }
    }
}

/// A value read from or written to a characteristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    /// Boolean, as some hosts send for `Active`.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value, for temperatures.
    Float(f64),
}

impl CharacteristicValue {
    /// Returns the value as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
        }
    }

    /// Converts the value to an integer for `characteristic`.
    ///
    /// Floats are rounded to the nearest integer; booleans map to 0 and 1.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::WrongType` for a non-finite float.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn to_integer(self, characteristic: Characteristic) -> Result<i64, ValueError> {
        match self {
            Self::Bool(b) => Ok(i64::from(b)),
            Self::Int(v) => Ok(v),
            // `as` saturates.
            Self::Float(v) if v.is_finite() => Ok(v.round() as i64),
            Self::Float(_) => Err(ValueError::WrongType {
                characteristic,
                expected: "finite number",
            }),
        }
    }

    /// Converts the value to a number, refusing booleans.
    pub(crate) fn to_number(self, characteristic: Characteristic) -> Result<i64, ValueError> {
        if matches!(self, Self::Bool(_)) {
            return Err(ValueError::WrongType {
                characteristic,
                expected: "numeric",
            });
        }
        self.to_integer(characteristic)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_and_fixed_are_disjoint() {
        for ch in Characteristic::ALL {
            assert!(!(ch.is_read_only() && ch.fixed_value().is_some()), "{ch}");
        }
    }

    #[test]
    fn props_match_stove_limits() {
        let threshold = Characteristic::HeatingThresholdTemperature.props();
        assert_eq!((threshold.min, threshold.max, threshold.step), (7, 30, 1));

        let speed = Characteristic::RotationSpeed.props();
        assert_eq!((speed.min, speed.max), (1, 4));

        let current = Characteristic::CurrentTemperature.props();
        assert_eq!((current.min, current.max), (0, 50));

        let state = Characteristic::CurrentHeaterCoolerState.props();
        assert_eq!(state.valid_values, Some(vec![0, 1, 2]));
    }

    #[test]
    fn locked_props_accept_only_their_value() {
        let target = Characteristic::TargetHeaterCoolerState.props();
        assert!(target.accepts(TARGET_STATE_HEAT));
        assert!(!target.accepts(0));
        assert_eq!(target.min, target.max);

        assert!(Characteristic::TemperatureDisplayUnits.props().accepts(UNITS_CELSIUS));
        assert!(!Characteristic::TemperatureDisplayUnits.props().accepts(1));
    }

    #[test]
    fn integer_conversion() {
        let ch = Characteristic::RotationSpeed;
        assert_eq!(CharacteristicValue::Float(2.6).to_integer(ch), Ok(3));
        assert_eq!(CharacteristicValue::Bool(true).to_integer(ch), Ok(1));
        assert!(CharacteristicValue::Float(f64::NAN).to_integer(ch).is_err());
        assert_eq!(
            CharacteristicValue::Bool(true).to_number(ch),
            Err(ValueError::WrongType {
                characteristic: ch,
                expected: "numeric"
            })
        );
    }

    #[test]
    fn display() {
        assert_eq!(Characteristic::SwingMode.to_string(), "SwingMode");
        assert_eq!(CharacteristicValue::Float(19.5).to_string(), "19.5");
    }
}
