// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted transport for unit tests.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::ProtocolError;
use crate::protocol::{HttpRequest, HttpResponse, Transport};

/// Replays queued responses in order and records every request.
///
/// An exhausted queue answers with HTTP 503.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ProtocolError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    pub(crate) fn push_timeout(&self) {
        self.responses
            .lock()
            .push_back(Err(ProtocolError::Timeout(10_000)));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    /// Requests whose `method` query parameter equals `method`.
    pub(crate) fn method_calls(&self, method: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.query_value("method") == Some(method))
            .count()
    }
}

impl Transport for FakeTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ProtocolError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(503, vec![], "")))
    }
}

/// A login redirect carrying `token`.
pub(crate) fn login_response(token: &str) -> HttpResponse {
    HttpResponse::new(
        302,
        vec![
            "PHPSESSID=session; path=/".to_string(),
            format!("remember={token}; path=/; HttpOnly"),
        ],
        "",
    )
}

/// A 200 response with `body` as JSON.
pub(crate) fn envelope(body: &Value) -> HttpResponse {
    HttpResponse::new(200, vec![], body.to_string())
}

/// A status payload with the given raw state and healthy codes.
pub(crate) fn status_payload(state: i64) -> Value {
    json!({
        "deviceStatus": state,
        "airTemperature": 19.5,
        "lastSetAirTemperature": 21,
        "realPower": 2,
        "lastSetPower": 3,
        "isDeviceInAlarm": 0,
        "contactStatus": 0
    })
}

/// A successful `get-state` response.
pub(crate) fn status_envelope(state: i64) -> HttpResponse {
    envelope(&json!({"status": 0, "message": status_payload(state)}))
}
