use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative cancellation for monitoring sessions.
///
/// Clones share the same flag; once requested, cancellation is permanent.
/// A session observes it at its next suspension point (status query or
/// backoff wait).
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation
    pub fn request_cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Check if cancellation was requested
    pub fn is_cancel_requested(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
