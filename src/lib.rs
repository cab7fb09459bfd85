// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pellet Stove Lib - A Rust library to control cloud-connected pellet stoves.
//!
//! This library bridges a Piazzetta pellet stove, reachable only through the
//! vendor's web service, to a home-automation host that sees it as a
//! heater-cooler accessory.
//!
//! # Supported Features
//!
//! - **Session**: Cookie-token login, retried once, renewed every 24 hours
//! - **Status**: Operating phase, temperatures and power, cached for 10 seconds
//! - **Control**: On/off with swing protection, target temperature, power level
//! - **Accessory adapter**: Characteristic get/set with locked values and ranges
//!
//! # Quick Start
//!
//! ```no_run
//! use pellet_stove_lib::{Stove, StoveConfig};
//! use pellet_stove_lib::types::ActiveState;
//!
//! #[tokio::main]
//! async fn main() -> pellet_stove_lib::Result<()> {
//!     let config = StoveConfig::new("ABC123", "me@example.com", "password");
//!     let stove = Stove::http(config).build()?;
//!
//!     stove.login().await?;
//!
//!     let status = stove.status().await?;
//!     println!("{} at {} °C", status.state(), status.current_temperature());
//!
//!     stove.set_target_power(3).await?;
//!     stove.set_active(ActiveState::Active).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## As an Accessory
//!
//! ```no_run
//! use std::sync::Arc;
//! use pellet_stove_lib::{HeaterCoolerAccessory, Stove, StoveConfig};
//! use pellet_stove_lib::accessory::Characteristic;
//!
//! #[tokio::main]
//! async fn main() -> pellet_stove_lib::Result<()> {
//!     let config = StoveConfig::from_json(
//!         r#"{"name": "Stove", "id": "ABC123", "login": "me", "password": "pw"}"#,
//!     )?;
//!     let (stove, relogin) = Stove::http(config.clone()).start()?;
//!     let accessory = HeaterCoolerAccessory::new(Arc::new(stove), &config);
//!
//!     accessory.on_characteristic_updated(|characteristic, value| {
//!         println!("{characteristic} = {value}");
//!     });
//!
//!     let active = accessory.get(Characteristic::Active).await?;
//!     println!("active: {active}");
//!
//!     relogin.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod guard;
pub mod protocol;
pub mod response;
pub mod session;
pub mod state;
mod stove;
pub mod subscription;
pub mod types;

#[cfg(test)]
mod testing;

pub use accessory::{AccessoryInformation, HeaterCoolerAccessory};
pub use command::{ApiMethod, Parameter};
pub use config::StoveConfig;
pub use dispatcher::{Dispatcher, FRONTEND_PATH};
pub use error::{Error, GuardError, ParseError, ProtocolError, Result, ValueError};
pub use guard::{GuardDecision, PowerChangeGuard};
#[cfg(feature = "http")]
pub use protocol::{HttpConfig, HttpTransport};
pub use protocol::{HttpRequest, HttpResponse, Transport};
pub use session::{AutoRelogin, Credentials, SessionManager};
pub use state::{StatusCache, StoveStatus};
pub use stove::{ReflectedState, Stove, StoveBuilder};
pub use subscription::{CallbackRegistry, StoveUpdate, SubscriptionId};
pub use types::{ActiveState, PowerLevel, RunningState, StoveState, TargetTemperature};
