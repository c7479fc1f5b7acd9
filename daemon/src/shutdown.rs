//! Stop-flag plumbing for the daemon process.
//!
//! A watch channel carries one boolean from the OS signal listener to the
//! HTTP server. The server future completes once the flag flips, after
//! draining requests already in flight.

use tokio::signal;
use tokio::sync::watch;

/// Raises the stop flag, either from an OS signal or programmatically.
pub struct StopSignal {
    tx: watch::Sender<bool>,
}

/// Observes the stop flag. Obtained from [`StopSignal::watcher`].
pub struct StopWatcher {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn watcher(&self) -> StopWatcher {
        StopWatcher { rx: self.tx.subscribe() }
    }

    /// Raise the flag by hand.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Block until SIGINT or SIGTERM arrives, then raise the flag.
    pub async fn listen(&self) {
        let interrupt = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = interrupt => tracing::info!("SIGINT received, stopping"),
            _ = terminate => tracing::info!("SIGTERM received, stopping"),
        }

        self.trigger();
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopWatcher {
    /// Resolves once the stop flag is up. A watcher taken after the flag
    /// was already raised resolves immediately.
    pub async fn stopped(mut self) {
        while !*self.rx.borrow_and_update() {
            // A dropped sender counts as a stop.
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
