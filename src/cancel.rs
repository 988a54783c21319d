//! Cooperative cancellation for pipelines.
//!
//! Follows the broadcast-channel shutdown pattern: one signal, any number
//! of watchers. A watcher whose signal side has been dropped never fires,
//! so losing the signal cannot spuriously cancel a pipeline.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Sender side of a cancellation signal.
pub struct CancelSignal {
    tx: broadcast::Sender<()>,
}

impl CancelSignal {
    /// Create a new cancellation signal.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Cancel every pipeline watching this signal.
    pub fn cancel(&self) {
        let _ = self.tx.send(());
    }

    /// Create a watcher for use in a pipeline.
    pub fn watcher(&self) -> CancelWatcher {
        CancelWatcher {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of watchers still attached.
    pub fn watcher_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of a cancellation signal.
pub struct CancelWatcher {
    rx: broadcast::Receiver<()>,
}

impl CancelWatcher {
    /// Resolve when the signal fires. Pends forever if the signal side
    /// was dropped without firing.
    pub async fn cancelled(&mut self) {
        match self.rx.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_reaches_watcher() {
        let signal = CancelSignal::new();
        let mut watcher = signal.watcher();
        signal.cancel();
        watcher.cancelled().await;
    }

    #[tokio::test]
    async fn test_dropped_signal_does_not_cancel() {
        let signal = CancelSignal::new();
        let mut watcher = signal.watcher();
        drop(signal);

        let fired = tokio::time::timeout(Duration::from_millis(20), watcher.cancelled()).await;
        assert!(fired.is_err(), "watcher must pend after signal is dropped");
    }

    #[tokio::test]
    async fn test_watcher_count() {
        let signal = CancelSignal::new();
        assert_eq!(signal.watcher_count(), 0);
        let _w = signal.watcher();
        assert_eq!(signal.watcher_count(), 1);
    }
}
