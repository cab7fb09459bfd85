// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `{status, message}` envelope decoding.

use serde_json::Value;

use crate::error::{Error, ParseError};

const STATUS_KEY: &str = "status";
const MESSAGE_KEY: &str = "message";

/// Decodes a frontend response body.
///
/// - `{"status": 0, "message": M}` yields `M`
/// - `{"status": 1, "message": M}` yields [`Error::Api`] carrying `M`
/// - anything else yields [`Error::Parse`]
///
/// A message counts as present only if it is not `null`, `false`, `0` or
/// the empty string.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::response::decode_envelope;
///
/// let payload = decode_envelope(r#"{"status": 0, "message": {"deviceStatus": 4}}"#).unwrap();
/// assert_eq!(payload["deviceStatus"], 4);
///
/// assert!(decode_envelope(r#"{"status": 2}"#).is_err());
/// ```
///
/// # Errors
///
/// Returns `Error::Api` for application errors and `Error::Parse` for any
/// other unrecognized shape.
pub fn decode_envelope(body: &str) -> Result<Value, Error> {
    let mut json: Value = serde_json::from_str(body).map_err(ParseError::Json)?;

    let status = json.get(STATUS_KEY).and_then(status_code);
    let message = json
        .get_mut(MESSAGE_KEY)
        .filter(|m| is_present(m))
        .map(Value::take);

    match (status, message) {
        (Some(0), Some(message)) => Ok(message),
        (Some(1), Some(message)) => Err(Error::Api(message_text(message))),
        _ => Err(ParseError::UnexpectedFormat(body.to_string()).into()),
    }
}

/// Integral status, whether sent as `0` or `0.0`.
#[allow(clippy::cast_possible_truncation)]
fn status_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= 1e15)
            .map(|f| f as i64)
    })
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn message_text(message: Value) -> String {
    match message {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
