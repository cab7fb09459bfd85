// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated method calls against the cloud frontend endpoint.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::command::ApiMethod;
use crate::error::{Error, ProtocolError};
use crate::protocol::{HttpRequest, Transport};
use crate::response::decode_envelope;
use crate::session::SessionManager;

/// Frontend endpoint path.
pub const FRONTEND_PATH: &str = "/en/ajax/action/frontend/response/ajax/";

/// Sends [`ApiMethod`]s for one device.
///
/// Calls are serialized: at most one exchange with the remote API is in
/// flight per dispatcher. No call is retried.
pub struct Dispatcher<P: Transport> {
    transport: Arc<P>,
    session: Arc<SessionManager<P>>,
    device_id: String,
    exchange: Mutex<()>,
}

impl<P: Transport> Dispatcher<P> {
    /// Creates a dispatcher for `device_id`.
    #[must_use]
    pub fn new(
        transport: Arc<P>,
        session: Arc<SessionManager<P>>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            session,
            device_id: device_id.into(),
            exchange: Mutex::new(()),
        }
    }

    /// Returns the device id calls are addressed to.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Builds the request for `method` without sending it.
    #[must_use]
    pub fn build_request(&self, method: &ApiMethod, token: &str) -> HttpRequest {
        let mut request = HttpRequest::get(FRONTEND_PATH)
            .with_query("device", self.device_id.as_str())
            .with_query("method", method.name());
        if let Some(params) = method.params() {
            request = request.with_query("params", params);
        }
        request.with_token(token)
    }

    /// Calls `method` and returns the decoded `message` payload.
    ///
    /// # Errors
    ///
    /// - `Error::NotAuthenticated` if no session is held (nothing is sent)
    /// - `Error::Protocol` if the exchange fails or the status is neither
    ///   2xx nor 302
    /// - `Error::Api` if the API reports an error
    /// - `Error::Parse` if the response shape is not recognized
    pub async fn call_method(&self, method: &ApiMethod) -> Result<Value, Error> {
        let Some(token) = self.session.token() else {
            tracing::debug!(method = %method, "Refusing call without session");
            return Err(Error::NotAuthenticated);
        };

        let request = self.build_request(method, &token);
        tracing::debug!(method = %method, "Sending API method");

        let result = {
            let _exchange = self.exchange.lock().await;
            self.transport.get(&request).await
        };

        let payload = result
            .map_err(Error::Protocol)
            .and_then(|response| {
                if response.is_accepted() {
                    Ok(response)
                } else {
                    Err(ProtocolError::UnexpectedStatus(response.status()).into())
                }
            })
            .and_then(|response| decode_envelope(response.body()));

        match &payload {
            Ok(message) => tracing::debug!(method = %method, %message, "API method succeeded"),
            Err(e) => tracing::debug!(method = %method, error = %e, "API method failed"),
        }

        payload
    }
}

impl<P: Transport> std::fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}
