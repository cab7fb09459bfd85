// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stove state tracking.
//!
//! [`StoveStatus`] is a snapshot of what the cloud reports and derives the
//! user-facing active and running states. [`StatusCache`] keeps the latest
//! snapshot and decides when it is too old to serve.

mod cache;
mod stove_status;

pub use cache::StatusCache;
pub use stove_status::StoveStatus;
