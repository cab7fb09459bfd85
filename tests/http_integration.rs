// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport using wiremock.

use std::sync::Arc;
use std::time::Duration;

use pellet_stove_lib::accessory::{Characteristic, CharacteristicValue};
use pellet_stove_lib::protocol::{HttpConfig, HttpRequest, Transport};
use pellet_stove_lib::types::{ActiveState, RunningState, StoveState};
use pellet_stove_lib::{Error, HeaterCoolerAccessory, ProtocolError, Stove, StoveConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRONTEND: &str = "/en/ajax/action/frontend/response/ajax/";

fn config(server: &MockServer) -> StoveConfig {
    StoveConfig::new("STOVE-1", "me@example.com", "p&ss word").with_base_url(server.uri())
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .and(query_param("login[username]", "me@example.com"))
        .and(query_param("login[password]", "p&ss word"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/en/home/")
                .append_header("set-cookie", "PHPSESSID=abc; path=/")
                .append_header("set-cookie", format!("remember={token}; path=/; HttpOnly")),
        )
        .mount(server)
        .await;
}

fn status_message(state: i64) -> serde_json::Value {
    json!({
        "status": 0,
        "message": {
            "deviceStatus": state,
            "airTemperature": 20.5,
            "lastSetAirTemperature": 22,
            "realPower": 2,
            "lastSetPower": 3,
            "isDeviceInAlarm": 0,
            "contactStatus": 0
        }
    })
}

async fn logged_in_stove(server: &MockServer) -> Stove<pellet_stove_lib::HttpTransport> {
    mount_login(server, "tok123").await;
    let stove = Stove::http(config(server)).build().unwrap();
    stove.login().await.unwrap();
    stove
}

// ============================================================================
// Transport Tests
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn redirect_is_not_followed() {
        let server = MockServer::start().await;
        mount_login(&server, "tok").await;

        let transport = HttpConfig::new()
            .with_base_url(server.uri())
            .into_transport()
            .unwrap();
        let request = HttpRequest::get("/en/login/")
            .with_query("login[username]", "me@example.com")
            .with_query("login[password]", "p&ss word");

        let response = transport.get(&request).await.unwrap();
        assert_eq!(response.status(), 302);
        assert!(response.is_accepted());
        assert_eq!(response.set_cookies().len(), 2);
    }

    #[tokio::test]
    async fn sends_cookie_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .and(header("cookie", "remember=tok"))
            .and(header(
                "user-agent",
                concat!("pellet_stove_lib/", env!("CARGO_PKG_VERSION")),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpConfig::new()
            .with_base_url(server.uri())
            .into_transport()
            .unwrap();
        let response = transport
            .get(&HttpRequest::get(FRONTEND).with_token("tok"))
            .await
            .unwrap();
        assert_eq!(response.body(), "{}");
    }

    #[tokio::test]
    async fn slow_server_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let transport = HttpConfig::new()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(300))
            .into_transport()
            .unwrap();
        let err = transport.get(&HttpRequest::get(FRONTEND)).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout(300)));
    }

    #[tokio::test]
    async fn unreachable_server_is_protocol_error() {
        let transport = HttpConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .into_transport()
            .unwrap();
        let err = transport.get(&HttpRequest::get("/")).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Http(_)));
    }
}

// ============================================================================
// Session Tests
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn login_stores_token() {
        let server = MockServer::start().await;
        let stove = logged_in_stove(&server).await;

        assert!(stove.session().is_authenticated());
        assert_eq!(stove.session().token().as_deref(), Some("tok123"));
    }

    #[tokio::test]
    async fn sub_second_config_timeout_is_applied() {
        let server = MockServer::start().await;
        mount_login(&server, "fast").await;

        let config = config(&server).with_timeout(Duration::from_millis(500));
        let stove = Stove::http(config).build().unwrap();
        stove.login().await.unwrap();
        assert_eq!(stove.session().token().as_deref(), Some("fast"));
    }

    #[tokio::test]
    async fn zero_config_timeout_is_rejected() {
        let server = MockServer::start().await;
        let config = config(&server).with_timeout(Duration::ZERO);
        assert!(matches!(Stove::http(config).build(), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let stove = Stove::http(config(&server)).build().unwrap();
        let err = stove.login().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(!stove.session().is_authenticated());
    }

    #[tokio::test]
    async fn auto_relogin_makes_two_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/login/"))
            .respond_with(
                ResponseTemplate::new(302).append_header("set-cookie", "remember=t; path=/"),
            )
            .expect(2)
            .mount(&server)
            .await;

        let stove = Stove::http(config(&server)).build().unwrap();
        assert!(stove.auto_relogin(true).await);
    }

    #[tokio::test]
    async fn call_without_session_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let stove = Stove::http(config(&server)).build().unwrap();
        let err = stove.status().await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
        assert_eq!(err.to_string(), "not logged-in");
    }
}

// ============================================================================
// Stove Tests
// ============================================================================

mod stove {
    use super::*;

    #[tokio::test]
    async fn status_is_fetched_once_then_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .and(query_param("device", "STOVE-1"))
            .and(query_param("method", "get-state"))
            .and(header("cookie", "remember=tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_message(4)))
            .expect(1)
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;

        let status = stove.status().await.unwrap();
        assert_eq!(status.state(), StoveState::Working);
        assert_eq!(stove.active().await.unwrap(), ActiveState::Active);
        assert_eq!(stove.running_state().await.unwrap(), RunningState::Heating);
        assert!(stove.refreshed_at().is_some());
    }

    #[tokio::test]
    async fn temperature_write_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .and(query_param("method", "write-parameters-queue"))
            .and(query_param("params", "set-air-temperature=30"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": 0, "message": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;
        let applied = stove.set_target_temperature(45).await.unwrap();
        assert_eq!(applied.value(), 30);
    }

    #[tokio::test]
    async fn heater_on_fills_cache_from_answer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .and(query_param("method", "heater-on"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_message(3)))
            .expect(1)
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;
        stove.set_active(ActiveState::Active).await.unwrap();

        assert_eq!(stove.cached_status().state(), StoveState::Lighting);
        // Turning off right away is refused locally.
        let err = stove.set_active(ActiveState::Inactive).await.unwrap_err();
        assert!(matches!(err, Error::Guard(_)));
    }

    #[tokio::test]
    async fn api_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": 1, "message": "device not found"})),
            )
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;
        let err = stove.status().await.unwrap_err();
        assert!(matches!(err, Error::Api(ref m) if m == "device not found"));
    }

    #[tokio::test]
    async fn server_error_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;
        let err = stove.set_target_power(2).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedStatus(500))
        ));
        assert_eq!(stove.reflected().target_power.value(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;
        assert!(matches!(stove.status().await, Err(Error::Parse(_))));
    }
}

// ============================================================================
// Accessory Tests
// ============================================================================

mod accessory {
    use super::*;

    #[tokio::test]
    async fn accessory_reads_through_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRONTEND))
            .and(query_param("method", "get-state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_message(7)))
            .expect(1)
            .mount(&server)
            .await;

        let stove = logged_in_stove(&server).await;
        let accessory = HeaterCoolerAccessory::new(Arc::new(stove), &config(&server));

        assert_eq!(
            accessory.get(Characteristic::CurrentHeaterCoolerState).await.unwrap(),
            CharacteristicValue::Int(1)
        );
        assert_eq!(
            accessory.get(Characteristic::CurrentTemperature).await.unwrap(),
            CharacteristicValue::Float(20.5)
        );
        assert_eq!(accessory.information().serial_number, "STOVE-1");
    }
}
