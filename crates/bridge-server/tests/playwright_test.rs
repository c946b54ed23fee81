//! Automation proxy against a mock automation service

mod common;

use axum::body::Body;
use axum::http::StatusCode;
use bridge_core::config::{BridgeConfig, PlaywrightConfig};
use common::*;
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> BridgeConfig {
    BridgeConfig {
        playwright: PlaywrightConfig {
            port: server.address().port(),
            timeout_secs: 1,
        },
        ..Default::default()
    }
}

/// A port nothing listens on
async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_action_is_translated_and_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .and(body_json(json!({
            "name": "browser_navigate",
            "arguments": {"url": "https://example.com"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "navigated"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = gateway(config_for(&server)).router();
    let response = app
        .oneshot(json_request(
            "/playwright",
            json!({"action": "navigate", "params": {"url": "https://example.com"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["content"][0]["text"], "navigated");
}

#[tokio::test]
async fn test_unknown_action_is_rejected_locally() {
    let server = MockServer::start().await;
    let app = gateway(config_for(&server)).router();

    let response = app
        .oneshot(json_request("/playwright", json!({"action": "teleport"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_explicit_error_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isError": true,
            "content": [{"type": "text", "text": "element not found"}]
        })))
        .mount(&server)
        .await;

    let app = gateway(config_for(&server)).router();
    let response = app
        .oneshot(json_request("/playwright", json!({"action": "click", "params": {"ref": "e1"}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("element not found"));
}

#[tokio::test]
async fn test_http_error_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .respond_with(ResponseTemplate::new(500).set_body_string("crashed"))
        .mount(&server)
        .await;

    let app = gateway(config_for(&server)).router();
    let response = app
        .oneshot(json_request("/playwright", json!({"action": "back"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_slow_service_is_gateway_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let app = gateway(config_for(&server)).router();
    let response = app
        .oneshot(json_request("/playwright", json!({"action": "snapshot"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let config = BridgeConfig {
        playwright: PlaywrightConfig {
            port: closed_port().await,
            timeout_secs: 1,
        },
        ..Default::default()
    };
    let app = gateway(config).router();

    let response = app
        .oneshot(json_request("/playwright", json!({"action": "screenshot"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_status_reports_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "0.0.41"})))
        .mount(&server)
        .await;

    let app = gateway(config_for(&server)).router();
    let response = app
        .oneshot(authorized("GET", "/playwright/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::body_json(response).await,
        json!({"available": true, "version": "0.0.41"})
    );
}

#[tokio::test]
async fn test_status_when_unreachable() {
    let config = BridgeConfig {
        playwright: PlaywrightConfig {
            port: closed_port().await,
            timeout_secs: 1,
        },
        ..Default::default()
    };
    let app = gateway(config).router();

    let response = app
        .oneshot(authorized("GET", "/playwright/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::body_json(response).await,
        json!({"available": false, "version": null})
    );
}
