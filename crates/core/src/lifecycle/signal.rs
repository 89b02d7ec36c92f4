//! Shutdown signal handling (SIGTERM/SIGINT).

use tokio::sync::watch;

/// Listens for OS termination signals and flips a shutdown flag.
pub struct ShutdownSignal {
    shutdown_tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    /// Create the listener and a receiver that becomes `true` on shutdown.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { shutdown_tx: tx }, rx)
    }

    /// Wait for Ctrl+C (or SIGTERM on unix), then notify receivers.
    pub async fn run(self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {
                            tracing::info!("Received SIGINT, initiating shutdown...");
                        }
                        _ = sigterm.recv() => {
                            tracing::info!("Received SIGTERM, initiating shutdown...");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("failed to install SIGTERM handler: {e}");
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received SIGINT, initiating shutdown...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("failed to listen for Ctrl+C: {e}");
            }
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }

        self.trigger();
    }

    /// Flip the shutdown flag without waiting for a signal.
    pub fn trigger(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_flips_receiver() {
        let (signal, rx) = ShutdownSignal::new();
        assert!(!*rx.borrow());
        signal.trigger();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn test_receiver_wakes_on_trigger() {
        let (signal, mut rx) = ShutdownSignal::new();
        let waiter = tokio::spawn(async move { rx.wait_for(|v| *v).await.is_ok() });
        signal.trigger();
        assert!(waiter.await.unwrap());
    }
}
