//! Process signals while serving
//!
//! SIGHUP asks for a configuration reload; SIGINT and SIGTERM stop the
//! gateway. Other platforms only see Ctrl+C.

/// What a received signal asks the server loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Reload,
    Shutdown,
}

#[cfg(unix)]
mod imp {
    use super::SignalEvent;
    use futures::stream::StreamExt;
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook_tokio::{Handle, Signals};

    pub struct SignalHandler {
        signals: Signals,
        handle: Handle,
    }

    impl SignalHandler {
        pub fn new() -> std::io::Result<Self> {
            let signals = Signals::new([SIGHUP, SIGINT, SIGTERM])?;
            let handle = signals.handle();
            Ok(Self { signals, handle })
        }

        /// Wait for the next signal; `Shutdown` once the stream ends
        pub async fn next(&mut self) -> SignalEvent {
            match self.signals.next().await {
                Some(SIGHUP) => SignalEvent::Reload,
                _ => SignalEvent::Shutdown,
            }
        }
    }

    impl Drop for SignalHandler {
        fn drop(&mut self) {
            self.handle.close();
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::SignalEvent;

    pub struct SignalHandler;

    impl SignalHandler {
        pub fn new() -> std::io::Result<Self> {
            Ok(Self)
        }

        pub async fn next(&mut self) -> SignalEvent {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            }
            SignalEvent::Shutdown
        }
    }
}

pub use imp::SignalHandler;
