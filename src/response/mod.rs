// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response decoding for the stove cloud API.
//!
//! - [`decode_envelope`]: unwraps the `{status, message}` envelope every
//!   frontend call returns
//! - [`StatusPayload`]: the stove status carried in a `get-state` message

mod envelope;
mod status;

pub use envelope::decode_envelope;
pub use status::StatusPayload;
