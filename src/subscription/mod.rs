// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for stove updates.
//!
//! Accessory hosts need to be told when a value changed outside of a `get`
//! (after a successful `set`, or when a refresh brought in a new status).
//! Register a callback on the stove and translate the [`StoveUpdate`]s it
//! receives.
//!
//! ```no_run
//! use pellet_stove_lib::{Stove, StoveConfig};
//! use pellet_stove_lib::subscription::StoveUpdate;
//!
//! # fn example() -> pellet_stove_lib::Result<()> {
//! let stove = Stove::http(StoveConfig::new("ABC123", "me@example.com", "pw")).build()?;
//!
//! let sub_id = stove.on_update(|update| {
//!     if let StoveUpdate::Active(state) = update {
//!         println!("stove is now {state}");
//!     }
//! });
//!
//! stove.unsubscribe(sub_id);
//! # Ok(())
//! # }
//! ```

mod callback;

pub use callback::{CallbackRegistry, StoveUpdate, SubscriptionId};
