//! Shared fixtures for gateway tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use bridge_core::config::{BridgeConfig, DEFAULT_EXTENSION_ORIGIN};
use bridge_core::llm::{ModelMessage, RequestOptions, ResponsePart, ResponsePartStream};
use bridge_core::{BridgeResult, CapabilityModel, CapabilityModelProvider};
use bridge_server::{CLIENT_HEADER, CLIENT_HEADER_VALUE, Gateway};
use bridge_tools::TerminalLauncher;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Model that streams fixed chunks, optionally never finishing
pub struct FixedModel {
    pub id: String,
    pub chunks: Vec<String>,
    pub hang: bool,
    pub last_cancel: Mutex<Option<CancellationToken>>,
}

impl FixedModel {
    pub fn new(id: &str, chunks: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            hang: false,
            last_cancel: Mutex::new(None),
        }
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }
}

#[async_trait]
impl CapabilityModel for FixedModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    async fn send_request(
        &self,
        _messages: Vec<ModelMessage>,
        _options: RequestOptions,
        cancel: CancellationToken,
    ) -> BridgeResult<ResponsePartStream> {
        *self.last_cancel.lock() = Some(cancel);
        let parts: Vec<BridgeResult<ResponsePart>> = self
            .chunks
            .iter()
            .map(|c| Ok(ResponsePart::Text(c.clone())))
            .collect();
        let stream = futures::stream::iter(parts);
        if self.hang {
            Ok(stream.chain(futures::stream::pending()).boxed())
        } else {
            Ok(stream.boxed())
        }
    }
}

pub struct FixedProvider(pub Vec<Arc<FixedModel>>);

#[async_trait]
impl CapabilityModelProvider for FixedProvider {
    async fn select_models(&self, family: Option<&str>) -> BridgeResult<Vec<Arc<dyn CapabilityModel>>> {
        Ok(self
            .0
            .iter()
            .filter(|m| family.is_none_or(|f| m.family() == f))
            .map(|m| Arc::clone(m) as Arc<dyn CapabilityModel>)
            .collect())
    }
}

pub struct NoopLauncher;

#[async_trait]
impl TerminalLauncher for NoopLauncher {
    async fn launch(&self, _command: &str) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn gateway_with(config: BridgeConfig, models: Vec<Arc<FixedModel>>) -> Gateway {
    Gateway::new(config, Arc::new(FixedProvider(models)), Arc::new(NoopLauncher))
}

pub fn gateway(config: BridgeConfig) -> Gateway {
    gateway_with(config, vec![Arc::new(FixedModel::new("gpt-4o", &["Hello", ", world"]))])
}

/// Request carrying the allowed origin and the client header
pub fn authorized(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, DEFAULT_EXTENSION_ORIGIN)
        .header(CLIENT_HEADER, CLIENT_HEADER_VALUE)
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    authorized("POST", uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
