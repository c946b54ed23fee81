//! Core error types for Copilot Bridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> BridgeResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> BridgeResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context<C: std::fmt::Display>(self, context: C) -> BridgeResult<T> {
        self.map_err(|e| BridgeError::internal(format!("{}: {}", context, e)))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> BridgeResult<T> {
        self.map_err(|e| BridgeError::internal(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with context message
    fn context<C: std::fmt::Display>(self, context: C) -> BridgeResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> BridgeResult<T> {
        self.ok_or_else(|| BridgeError::internal(context.to_string()))
    }
}

/// Why an upstream service call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The service answered with an explicit error
    Failed,
    /// The service could not be reached
    Unavailable,
    /// The service did not answer in time
    Timeout,
}

/// Main error type for Copilot Bridge
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// Request origin is missing or not on the allow-list
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Client header is missing or wrong
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Request body failed schema validation
    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    /// Request body exceeded the size cap
    #[error("Payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Filesystem operation requested with no workspace configured
    #[error("No workspace folder is open")]
    NoWorkspace,

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },

    /// A proxied upstream service failed
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        failure: UpstreamFailure,
    },

    /// Chat backend errors
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
    },

    /// Tool execution errors
    #[error("Tool error: {tool_name}: {message}")]
    Tool { tool_name: String, message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// HTTP client errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("Operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Operation was cancelled by the caller
    #[error("Operation was cancelled")]
    Cancelled,

    /// Unexpected internal failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BridgeError {
    /// Stable code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "BRIDGE_FORBIDDEN",
            Self::Unauthorized { .. } => "BRIDGE_UNAUTHORIZED",
            Self::Validation { .. } => "BRIDGE_VALIDATION",
            Self::PayloadTooLarge { .. } => "BRIDGE_PAYLOAD_TOO_LARGE",
            Self::NoWorkspace => "BRIDGE_NO_WORKSPACE",
            Self::NotFound { .. } => "BRIDGE_NOT_FOUND",
            Self::Upstream { .. } => "BRIDGE_UPSTREAM",
            Self::Llm { .. } => "BRIDGE_LLM",
            Self::Tool { .. } => "BRIDGE_TOOL",
            Self::Config { .. } => "BRIDGE_CONFIG",
            Self::Io { .. } => "BRIDGE_IO",
            Self::Json { .. } => "BRIDGE_JSON",
            Self::Http { .. } => "BRIDGE_HTTP",
            Self::Timeout { .. } => "BRIDGE_TIMEOUT",
            Self::Cancelled => "BRIDGE_CANCELLED",
            Self::Internal { .. } => "BRIDGE_INTERNAL",
        }
    }

    /// HTTP status code the gateway answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden { .. } => 403,
            Self::Unauthorized { .. } => 401,
            Self::Validation { .. } | Self::NoWorkspace => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::NotFound { .. } => 404,
            Self::Upstream { failure, .. } => match failure {
                UpstreamFailure::Failed => 502,
                UpstreamFailure::Unavailable => 503,
                UpstreamFailure::Timeout => 504,
            },
            Self::Llm { .. }
            | Self::Tool { .. }
            | Self::Config { .. }
            | Self::Io { .. }
            | Self::Json { .. }
            | Self::Http { .. }
            | Self::Timeout { .. }
            | Self::Cancelled
            | Self::Internal { .. } => 500,
        }
    }

    /// Field-level messages for validation failures, empty otherwise
    pub fn details(&self) -> &[String] {
        match self {
            Self::Validation { errors } => errors,
            _ => &[],
        }
    }

    /// Whether this error came from a client mistake rather than the bridge
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
