//! Gateway lifecycle over a real socket

mod common;

use bridge_core::config::{BridgeConfig, DEFAULT_EXTENSION_ORIGIN};
use bridge_server::CLIENT_HEADER;
use common::*;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_start_serve_and_stop() {
    let mut gateway = gateway(BridgeConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = gateway.start_with_listener(listener).await.unwrap();
    assert_eq!(gateway.local_addr(), Some(addr));

    let client = reqwest::Client::new();
    let health: serde_json::Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let text = client
        .post(format!("http://{}/chat", addr))
        .header("Origin", DEFAULT_EXTENSION_ORIGIN)
        .header(CLIENT_HEADER, "chrome-extension")
        .json(&serde_json::json!({
            "settings": {"provider": "capability-model", "model": "gpt-4o"},
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "Hello, world");

    gateway.stop().await.unwrap();
    assert!(!gateway.is_running());
    let fresh = reqwest::Client::new();
    assert!(fresh.get(format!("http://{}/health", addr)).send().await.is_err());
}

#[tokio::test]
async fn test_second_start_is_rejected() {
    let mut gateway = gateway(BridgeConfig::default());
    gateway
        .start_with_listener(TcpListener::bind("127.0.0.1:0").await.unwrap())
        .await
        .unwrap();

    let again = gateway
        .start_with_listener(TcpListener::bind("127.0.0.1:0").await.unwrap())
        .await;
    assert!(again.is_err());
    gateway.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_without_start_is_noop() {
    let mut gateway = gateway(BridgeConfig::default());
    assert!(gateway.stop().await.is_ok());
}
