//! From trait implementations for BridgeError conversions

use super::types::BridgeError;

impl From<std::io::Error> for BridgeError {
    fn from(error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            return Self::not_found_resource(error.to_string(), "file");
        }
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}

impl From<crate::tools::ToolError> for BridgeError {
    fn from(error: crate::tools::ToolError) -> Self {
        Self::tool("unknown", error.to_string())
    }
}
