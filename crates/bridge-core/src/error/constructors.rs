//! Constructor methods for BridgeError

use super::types::{BridgeError, UpstreamFailure};

impl BridgeError {
    /// Create a forbidden (origin) error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an unauthorized (client header) error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a validation error for a single field message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![message.into()],
        }
    }

    /// Create a validation error from collected field messages
    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    /// Create a payload-too-large error
    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
        }
    }

    /// Create a not found error with resource type
    pub fn not_found_resource(message: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: Some(resource_type.into()),
        }
    }

    /// Upstream answered with an explicit error
    pub fn upstream_failed(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            failure: UpstreamFailure::Failed,
        }
    }

    /// Upstream could not be reached
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            failure: UpstreamFailure::Unavailable,
        }
    }

    /// Upstream did not answer in time
    pub fn upstream_timeout(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            failure: UpstreamFailure::Timeout,
        }
    }

    /// Create a new LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            provider: None,
        }
    }

    /// Create an LLM error with provider
    pub fn llm_with_provider(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Create a new tool error
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_distinct_statuses() {
        assert_eq!(BridgeError::forbidden("no origin").status_code(), 403);
        assert_eq!(BridgeError::unauthorized("bad header").status_code(), 401);
    }

    #[test]
    fn test_upstream_status_follows_failure_cause() {
        assert_eq!(BridgeError::upstream_failed("boom").status_code(), 502);
        assert_eq!(BridgeError::upstream_unavailable("down").status_code(), 503);
        assert_eq!(BridgeError::upstream_timeout("slow").status_code(), 504);
    }

    #[test]
    fn test_validation_keeps_every_field_message() {
        let err = BridgeError::validation_errors(vec![
            "settings.model must be a non-empty string".to_string(),
            "messages must be an array".to_string(),
        ]);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.details().len(), 2);
        assert!(err.to_string().contains("settings.model"));
        assert!(err.to_string().contains("messages must be an array"));
    }

    #[test]
    fn test_internal_errors_are_not_client_errors() {
        assert!(!BridgeError::internal("broken pipe").is_client_error());
        assert!(BridgeError::NoWorkspace.is_client_error());
        assert_eq!(BridgeError::payload_too_large(10).error_code(), "BRIDGE_PAYLOAD_TOO_LARGE");
    }
}
