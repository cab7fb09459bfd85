// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the pellet stove library.
//!
//! Every failure surfaces as a single [`Error`] value whose variant tells the
//! caller what kind of failure occurred: login, missing session, transport,
//! remote API rejection, payload decoding, or swing protection.

use std::time::Duration;

use thiserror::Error;

use crate::accessory::Characteristic;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Login was rejected or the response carried no session token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A method call was attempted without a valid session.
    #[error("not logged-in")]
    NotAuthenticated,

    /// The HTTP exchange itself failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The remote API answered with an application-level error.
    #[error("API error: {0}")]
    Api(String),

    /// The response could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The power-change guard refused the activation change.
    #[error("swing protection: {0}")]
    Guard(#[from] GuardError),

    /// A value did not fit the characteristic it was written to.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The characteristic cannot be written.
    #[error("characteristic {0} is read-only")]
    ReadOnly(Characteristic),

    /// The stove configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors related to the HTTP exchange with the remote API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status that is neither success nor 302.
    #[error("non-OK HTTP response status received: {0}")]
    UnexpectedStatus(u16),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to decoding remote API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected response format.
    #[error("unspecified error: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors raised by the power-change guard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The previous activation change happened too recently.
    #[error(
        "last power change is too close in time ({}s ago, cooldown is {}s)",
        elapsed.as_secs(),
        window.as_secs()
    )]
    Cooldown {
        /// Time elapsed since the last applied change.
        elapsed: Duration,
        /// The configured cooldown window.
        window: Duration,
    },
}

/// Errors related to characteristic values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// The value has the wrong type for the characteristic.
    #[error("expected a {expected} value for {characteristic}")]
    WrongType {
        /// The characteristic being written.
        characteristic: Characteristic,
        /// The expected value kind.
        expected: &'static str,
    },

    /// The value is not one of the characteristic's valid values.
    #[error("value {value} is not valid for {characteristic}")]
    NotAllowed {
        /// The characteristic being written.
        characteristic: Characteristic,
        /// The rejected value.
        value: f64,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
