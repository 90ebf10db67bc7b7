use tokio_util::sync::CancellationToken;
use tracing::info;

/// Turns SIGINT/SIGTERM into a cancelled token.
pub struct ShutdownService {
    token: CancellationToken,
}

impl ShutdownService {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Listen for termination signals in the background.
    pub fn install(&self) -> std::io::Result<()> {
        let token = self.token.clone();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;

            tokio::spawn(async move {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
                    _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
                    _ = token.cancelled() => return,
                }
                token.cancel();
            });
        }

        #[cfg(not(unix))]
        {
            tokio::spawn(async move {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => match result {
                        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                        Err(err) => {
                            tracing::error!("Unable to listen for shutdown signal: {}", err);
                            return;
                        }
                    },
                    _ = token.cancelled() => return,
                }
                token.cancel();
            });
        }

        Ok(())
    }
}

impl Default for ShutdownService {
    fn default() -> Self {
        Self::new()
    }
}
