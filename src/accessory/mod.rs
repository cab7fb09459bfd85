// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heater-cooler accessory adapter.
//!
//! Maps the get/set requests of a home-automation host onto a [`Stove`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use pellet_stove_lib::{Stove, StoveConfig};
//! use pellet_stove_lib::accessory::{Characteristic, CharacteristicValue, HeaterCoolerAccessory};
//!
//! # async fn example() -> pellet_stove_lib::Result<()> {
//! let config = StoveConfig::new("ABC123", "me@example.com", "password");
//! let (stove, _relogin) = Stove::http(config.clone()).start()?;
//! let accessory = HeaterCoolerAccessory::new(Arc::new(stove), &config);
//!
//! let temp = accessory.get(Characteristic::CurrentTemperature).await?;
//! accessory
//!     .set(Characteristic::HeatingThresholdTemperature, CharacteristicValue::Int(21))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod characteristic;

pub use characteristic::{
    CONTROL_LOCK_DISABLED, Characteristic, CharacteristicProps, CharacteristicValue,
    SWING_DISABLED, TARGET_STATE_HEAT, UNITS_CELSIUS,
};

use std::sync::Arc;

use crate::config::StoveConfig;
use crate::error::{Error, ValueError};
use crate::protocol::Transport;
use crate::stove::Stove;
use crate::subscription::{StoveUpdate, SubscriptionId};
use crate::types::{ActiveState, PowerLevel, TargetTemperature};

/// Static description of the accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    /// Device manufacturer.
    pub manufacturer: String,
    /// Device model.
    pub model: String,
    /// Display name.
    pub name: String,
    /// Device id.
    pub serial_number: String,
    /// This library's version.
    pub software_revision: String,
    /// This library's name.
    pub firmware_revision: String,
}

impl AccessoryInformation {
    /// Manufacturer reported for every stove.
    pub const MANUFACTURER: &'static str = "Piazzetta";
    /// Model reported for every stove.
    pub const MODEL: &'static str = "Piazzetta Stove";

    /// Describes the stove configured by `config`.
    #[must_use]
    pub fn from_config(config: &StoveConfig) -> Self {
        Self {
            manufacturer: Self::MANUFACTURER.to_string(),
            model: Self::MODEL.to_string(),
            name: config.name().to_string(),
            serial_number: config.id().to_string(),
            software_revision: env!("CARGO_PKG_VERSION").to_string(),
            firmware_revision: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// A stove exposed as a heater-cooler accessory.
pub struct HeaterCoolerAccessory<P: Transport> {
    stove: Arc<Stove<P>>,
    information: AccessoryInformation,
}

impl<P: Transport> HeaterCoolerAccessory<P> {
    /// Wraps `stove`, described by `config`.
    #[must_use]
    pub fn new(stove: Arc<Stove<P>>, config: &StoveConfig) -> Self {
        Self {
            stove,
            information: AccessoryInformation::from_config(config),
        }
    }

    /// Returns the accessory description.
    #[must_use]
    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Returns the underlying stove.
    #[must_use]
    pub fn stove(&self) -> &Arc<Stove<P>> {
        &self.stove
    }

    /// Returns the range advertised for `characteristic`.
    #[must_use]
    pub fn props(&self, characteristic: Characteristic) -> CharacteristicProps {
        characteristic.props()
    }

    /// Values to publish before the first read.
    #[must_use]
    pub fn initial_values(&self) -> Vec<(Characteristic, CharacteristicValue)> {
        vec![
            (
                Characteristic::Active,
                CharacteristicValue::Int(ActiveState::Inactive.as_num().into()),
            ),
            (Characteristic::CurrentHeaterCoolerState, CharacteristicValue::Int(0)),
            (
                Characteristic::TargetHeaterCoolerState,
                CharacteristicValue::Int(TARGET_STATE_HEAT),
            ),
            (
                Characteristic::TemperatureDisplayUnits,
                CharacteristicValue::Int(UNITS_CELSIUS),
            ),
            (Characteristic::CurrentTemperature, CharacteristicValue::Float(0.0)),
            (
                Characteristic::HeatingThresholdTemperature,
                CharacteristicValue::Float(f64::from(TargetTemperature::MIN)),
            ),
            (
                Characteristic::LockPhysicalControls,
                CharacteristicValue::Int(CONTROL_LOCK_DISABLED),
            ),
            (Characteristic::SwingMode, CharacteristicValue::Int(SWING_DISABLED)),
            (
                Characteristic::RotationSpeed,
                CharacteristicValue::Int(PowerLevel::MIN.into()),
            ),
        ]
    }

    /// Reads a characteristic.
    ///
    /// Locked characteristics answer without any request; the others go
    /// through the status cache.
    ///
    /// # Errors
    ///
    /// Returns error if the status cannot be refreshed.
    pub async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue, Error> {
        let value = match characteristic {
            Characteristic::Active => {
                CharacteristicValue::Int(self.stove.active().await?.as_num().into())
            }
            Characteristic::CurrentHeaterCoolerState => {
                CharacteristicValue::Int(self.stove.running_state().await?.as_num().into())
            }
            Characteristic::CurrentTemperature => {
                CharacteristicValue::Float(self.stove.current_temperature().await?)
            }
            Characteristic::HeatingThresholdTemperature => {
                CharacteristicValue::Float(self.stove.target_temperature().await?)
            }
            Characteristic::RotationSpeed => {
                CharacteristicValue::Int(self.stove.target_power().await?)
            }
            Characteristic::TargetHeaterCoolerState
            | Characteristic::LockPhysicalControls
            | Characteristic::SwingMode
            | Characteristic::TemperatureDisplayUnits => {
                return Ok(CharacteristicValue::Int(
                    characteristic.fixed_value().unwrap_or_default(),
                ));
            }
        };

        tracing::debug!(%characteristic, %value, "Characteristic read");
        Ok(value)
    }

    /// Writes a characteristic.
    ///
    /// Temperatures and power levels out of range are clamped. Writing a
    /// locked characteristic's own value is accepted without a request.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadOnly` for read-only characteristics,
    /// `Error::Value` for a value the characteristic never accepts, or the
    /// stove error if the change fails.
    pub async fn set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), Error> {
        if characteristic.is_read_only() {
            return Err(Error::ReadOnly(characteristic));
        }

        tracing::debug!(%characteristic, %value, "Characteristic write");

        match characteristic {
            Characteristic::Active => {
                let desired = u8::try_from(value.to_integer(characteristic)?)
                    .ok()
                    .and_then(ActiveState::from_num)
                    .ok_or_else(|| not_allowed(characteristic, value))?;
                self.stove.set_active(desired).await
            }
            Characteristic::HeatingThresholdTemperature => {
                let temperature = saturate(value.to_number(characteristic)?);
                self.stove.set_target_temperature(temperature).await.map(|_| ())
            }
            Characteristic::RotationSpeed => {
                let power = saturate(value.to_number(characteristic)?);
                self.stove.set_target_power(power).await.map(|_| ())
            }
            Characteristic::TargetHeaterCoolerState
            | Characteristic::LockPhysicalControls
            | Characteristic::SwingMode
            | Characteristic::TemperatureDisplayUnits => {
                if characteristic.fixed_value() == Some(value.to_number(characteristic)?) {
                    Ok(())
                } else {
                    Err(not_allowed(characteristic, value).into())
                }
            }
            Characteristic::CurrentHeaterCoolerState | Characteristic::CurrentTemperature => {
                Err(Error::ReadOnly(characteristic))
            }
        }
    }

    /// Registers a callback fired when a write to a characteristic succeeds.
    pub fn on_characteristic_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Characteristic, CharacteristicValue) + Send + Sync + 'static,
    {
        self.stove.on_update(move |update| match update {
            StoveUpdate::Active(state) => callback(
                Characteristic::Active,
                CharacteristicValue::Int(state.as_num().into()),
            ),
            StoveUpdate::TargetTemperature(temperature) => callback(
                Characteristic::HeatingThresholdTemperature,
                CharacteristicValue::Float(f64::from(temperature.value())),
            ),
            StoveUpdate::TargetPower(power) => callback(
                Characteristic::RotationSpeed,
                CharacteristicValue::Int(power.value().into()),
            ),
            StoveUpdate::Status(_) => {}
        })
    }

    /// Removes a callback. Returns false if the ID was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.stove.unsubscribe(id)
    }
}

impl<P: Transport> std::fmt::Debug for HeaterCoolerAccessory<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaterCoolerAccessory")
            .field("information", &self.information)
            .field("stove", &self.stove)
            .finish()
    }
}

fn not_allowed(characteristic: Characteristic, value: CharacteristicValue) -> ValueError {
    ValueError::NotAllowed {
        characteristic,
        value: match value {
            CharacteristicValue::Bool(b) => f64::from(u8::from(b)),
            other => other.as_f64().unwrap_or(f64::NAN),
        },
    }
}

/// Clamps to the `i32` range; setpoint clamping does the rest.
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
