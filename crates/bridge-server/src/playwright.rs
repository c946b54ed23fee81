//! Client for the local browser automation service

use bridge_core::config::PlaywrightConfig;
use bridge_core::config::timeouts::automation;
use bridge_core::{BridgeError, BridgeResult};
use serde_json::{Map, Value, json};
use std::time::Duration;

/// Bridge action names and the automation tools they map to
pub const ACTION_TABLE: [(&str, &str); 12] = [
    ("navigate", "browser_navigate"),
    ("click", "browser_click"),
    ("type", "browser_type"),
    ("screenshot", "browser_take_screenshot"),
    ("snapshot", "browser_snapshot"),
    ("back", "browser_navigate_back"),
    ("hover", "browser_hover"),
    ("select", "browser_select_option"),
    ("press", "browser_press_key"),
    ("wait", "browser_wait_for"),
    ("evaluate", "browser_evaluate"),
    ("close", "browser_close"),
];

/// Translate a bridge action into the automation tool name
pub fn tool_for_action(action: &str) -> Option<&'static str> {
    ACTION_TABLE
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, tool)| *tool)
}

/// Names accepted by [`tool_for_action`]
pub fn supported_actions() -> Vec<&'static str> {
    ACTION_TABLE.iter().map(|(name, _)| *name).collect()
}

/// Result of probing `GET /health`
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationStatus {
    pub available: bool,
    pub version: Option<String>,
}

/// HTTP client for `POST /tools/call` and `GET /health`
#[derive(Debug, Clone)]
pub struct PlaywrightClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    status_timeout: Duration,
}

impl PlaywrightClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            status_timeout: automation::status_timeout(),
        }
    }

    pub fn from_config(config: &PlaywrightConfig) -> Self {
        Self::new(config.base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke one automation tool
    ///
    /// An unreachable service is `Unavailable` (503), a slow one `Timeout`
    /// (504), and an explicit error answer `Failed` (502).
    pub async fn call_tool(&self, tool: &str, arguments: Map<String, Value>) -> BridgeResult<Value> {
        let url = format!("{}/tools/call", self.base_url);
        tracing::debug!(tool, %url, "calling automation tool");

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({ "name": tool, "arguments": arguments }))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(BridgeError::upstream_failed(format!(
                "Automation service returned HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let value: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| {
                BridgeError::upstream_failed(format!("Automation service sent invalid JSON: {}", e))
            })?
        };

        if let Some(message) = explicit_error(&value) {
            return Err(BridgeError::upstream_failed(message));
        }
        Ok(value)
    }

    /// Probe the service; never fails
    pub async fn status(&self) -> AutomationStatus {
        let url = format!("{}/health", self.base_url);
        let response = match self.http.get(&url).timeout(self.status_timeout).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "automation service unhealthy");
                return AutomationStatus {
                    available: false,
                    version: None,
                };
            }
            Err(e) => {
                tracing::debug!(error = %e, "automation service unreachable");
                return AutomationStatus {
                    available: false,
                    version: None,
                };
            }
        };

        let version = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("version").and_then(Value::as_str).map(str::to_string));
        AutomationStatus {
            available: true,
            version,
        }
    }

    fn classify(&self, error: reqwest::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::upstream_timeout(format!(
                "Automation service did not respond within {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            BridgeError::upstream_unavailable(format!(
                "Automation service is not reachable at {}",
                self.base_url
            ))
        } else {
            BridgeError::upstream_failed(format!("Automation service request failed: {}", error))
        }
    }
}

/// Error message carried by a 2xx answer, if any
fn explicit_error(value: &Value) -> Option<String> {
    if value.get("isError").and_then(Value::as_bool) == Some(true) {
        let text = value
            .get("content")
            .and_then(Value::as_array)
            .and_then(|parts| parts.iter().find_map(|p| p.get("text").and_then(Value::as_str)))
            .unwrap_or("Automation tool reported an error");
        return Some(text.to_string());
    }
    match value.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Object(error)) => Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Automation tool reported an error")
                .to_string(),
        ),
        _ => None,
    }
}
