//! Centralized timeout and size limits
//!
//! Values here are defaults; the remote and automation timeouts can be
//! overridden via configuration.

use std::time::Duration;

/// Default timeout values for remote chat backends
pub mod remote {
    use super::*;

    /// Wait for response headers and for each streamed read (30 seconds)
    pub const STREAM_SECS: u64 = 30;

    /// Get the stream timeout as Duration
    pub fn stream_timeout() -> Duration {
        Duration::from_secs(STREAM_SECS)
    }
}

/// Default timeout values for the local automation service
pub mod automation {
    use super::*;

    /// Tool call timeout (30 seconds)
    pub const CALL_SECS: u64 = 30;

    /// Status probe timeout (3 seconds)
    pub const STATUS_SECS: u64 = 3;

    /// Get the tool call timeout as Duration
    pub fn call_timeout() -> Duration {
        Duration::from_secs(CALL_SECS)
    }

    /// Get the status probe timeout as Duration
    pub fn status_timeout() -> Duration {
        Duration::from_secs(STATUS_SECS)
    }
}

/// Request and response size limits
pub mod limits {
    /// Largest accepted request body (5 MiB)
    pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

    /// Characters of page content forwarded to a backend
    pub const MAX_PAGE_CONTENT_CHARS: usize = 20_000;

    /// Characters returned by the read_file tool
    pub const MAX_READ_FILE_CHARS: usize = 10_000;
}
