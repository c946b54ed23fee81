//! Per-request cancellation
//!
//! Every `/chat` request owns one [`AbortSignal`]. Backend calls never see
//! the signal directly: they receive a [`CancellationBinding`], a child token
//! that fires when the signal aborts. Dropping the binding detaches it from
//! the signal, so release happens on every exit path (normal completion,
//! error, timeout, or the stream simply being dropped).

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Abort signal owned by one inbound request
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    token: CancellationToken,
}

impl AbortSignal {
    /// Create a new, un-aborted signal
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Abort the request
    pub fn abort(&self) {
        self.token.cancel();
    }

    /// Check whether the request has been aborted
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Bind a backend-specific cancellation token to this signal
    pub fn bind(&self) -> CancellationBinding {
        CancellationBinding {
            token: self.token.child_token(),
        }
    }

    /// Guard that aborts the signal when dropped
    ///
    /// The gateway parks this inside the response body so a client
    /// disconnect aborts everything bound to the request.
    pub fn abort_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}

/// A cancellation token bound to an [`AbortSignal`]
///
/// The binding is released when dropped.
#[derive(Debug)]
pub struct CancellationBinding {
    token: CancellationToken,
}

impl CancellationBinding {
    /// Token to hand to the backend call
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Check whether the bound signal has fired
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the bound signal fires
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

impl Drop for CancellationBinding {
    fn drop(&mut self) {
        tracing::trace!(cancelled = self.token.is_cancelled(), "releasing cancellation binding");
    }
}

/// Why a raced operation did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The caller aborted
    Cancelled,
    /// The deadline elapsed first
    TimedOut(Duration),
}

/// Race a future against cancellation and a timeout
///
/// Whichever fires first wins; cancellation is checked first when both are
/// ready at the same poll.
pub async fn race<F, T>(
    token: &CancellationToken,
    timeout: Duration,
    future: F,
) -> Result<T, Interruption>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Interruption::Cancelled),
        _ = tokio::time::sleep(timeout) => Err(Interruption::TimedOut(timeout)),
        value = future => Ok(value),
    }
}
