//! Signal handling for graceful shutdown

use tracing::{debug, warn};

/// Handles shutdown signals (Ctrl-C, plus SIGTERM on Unix)
pub struct ShutdownSignal;

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    ///
    /// If the handlers cannot be registered this never resolves.
    pub async fn wait(&self) {
        if let Err(e) = Self::recv().await {
            warn!(?e, "failed to register signal handlers, shutdown signals disabled");
            std::future::pending::<()>().await;
        }
    }

    #[cfg(unix)]
    async fn recv() -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                debug!("received SIGINT");
            }
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn recv() -> std::io::Result<()> {
        tokio::signal::ctrl_c().await?;
        debug!("received Ctrl-C");
        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
