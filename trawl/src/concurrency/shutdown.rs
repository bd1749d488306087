//! Broadcast shutdown signaling for pipeline workers.
//!
//! This module implements the pipeline cancellation signal on top of tokio's watch
//! channels: one transmitter owned by the pipeline, one receiver per component that
//! has a blocking channel operation to guard. The signal fires at most once per run,
//! is observed by every receiver, and is never lowered again.

use tokio::sync::watch;

/// Transmitter half of the pipeline shutdown channel.
///
/// [`ShutdownTx`] is held by the pipeline and cloned into the supervisor task.
/// Raising the signal is idempotent: only the first call notifies receivers,
/// later calls are no-ops that never panic.
#[derive(Debug, Clone)]
pub struct ShutdownTx {
    tx: watch::Sender<bool>,
}

impl ShutdownTx {
    /// Raises the shutdown signal for all subscribed receivers.
    ///
    /// Returns `true` if this call raised the signal and `false` if it was
    /// already raised. Receivers that subscribe after the raise still observe
    /// it, since the signal is a level and not an edge.
    pub fn shutdown(&self) -> bool {
        self.tx.send_if_modified(|raised| {
            if *raised {
                false
            } else {
                *raised = true;
                true
            }
        })
    }

    /// Creates a new receiver subscribed to this shutdown channel.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiver half of the pipeline shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx {
    rx: watch::Receiver<bool>,
}

impl ShutdownRx {
    /// Completes once the shutdown signal is raised.
    ///
    /// Resolves immediately if the signal was already raised when this is
    /// called. Also resolves if the transmitter is dropped without a raise,
    /// since a run whose controller is gone must not keep anything blocked.
    pub async fn signaled(&mut self) {
        let _ = self.rx.wait_for(|raised| *raised).await;
    }

    /// Returns whether the shutdown signal has been raised.
    pub fn is_signaled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Creates a new shutdown channel for one pipeline run.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx { tx }, ShutdownRx { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_is_raised_exactly_once() {
        let (tx, rx) = create_shutdown_channel();

        assert!(!rx.is_signaled());
        assert!(tx.shutdown());
        assert!(!tx.shutdown());
        assert!(!tx.shutdown());
        assert!(rx.is_signaled());
    }

    #[tokio::test]
    async fn all_receivers_observe_the_signal() {
        let (tx, mut first) = create_shutdown_channel();
        let mut second = tx.subscribe();

        tx.shutdown();

        first.signaled().await;
        second.signaled().await;
    }

    #[tokio::test]
    async fn late_subscribers_see_a_raised_signal() {
        let (tx, _rx) = create_shutdown_channel();
        tx.shutdown();

        let mut late = tx.subscribe();
        assert!(late.is_signaled());
        // Level-triggered: resolves even though the raise happened before the
        // subscription existed.
        late.signaled().await;
    }

    #[tokio::test]
    async fn dropped_transmitter_unblocks_receivers() {
        let (tx, mut rx) = create_shutdown_channel();
        drop(tx);

        rx.signaled().await;
    }
}
