//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The server and any background tasks hold a receiver; `trigger` wakes
/// all of them once.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        // No receivers left means nothing is running.
        let _ = self.tx.send(());
    }

    /// Trigger shutdown when SIGINT or SIGTERM arrives.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            crate::lifecycle::signals::wait_for_signal().await;
            this.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` observes a shutdown, or its sender is gone.
pub async fn recv_shutdown(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
