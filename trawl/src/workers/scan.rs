use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::concurrency::shutdown::ShutdownRx;
use crate::error::TrawlResult;
use crate::transform::Transform;

/// Consumer side of the item channel, shared by all scan workers.
///
/// Workers take turns receiving; the lock is held only across a single `recv`,
/// and every acquisition races the shutdown signal.
pub(crate) type SharedReceiver<I> = Arc<Mutex<mpsc::Receiver<I>>>;

/// Worker applying the transform to items pulled from the shared channel.
///
/// Each of the N scan workers runs the same loop: take an item, apply the
/// transform, forward the partial result if there is one. The worker exits
/// when the item channel is closed and drained, or when the shutdown signal
/// fires. Every item taken is evaluated exactly once.
///
/// Cancellation is best-effort at the result boundary: a partial result that
/// was fully enqueued before shutdown is still delivered, while one whose send
/// loses the race to the shutdown signal is dropped.
pub struct ScanWorker<T: Transform> {
    worker_id: u16,
    transform: Arc<T>,
    items: SharedReceiver<T::Item>,
    results: mpsc::Sender<T::Partial>,
    shutdown_rx: ShutdownRx,
}

impl<T: Transform> ScanWorker<T> {
    pub(crate) fn new(
        worker_id: u16,
        transform: Arc<T>,
        items: SharedReceiver<T::Item>,
        results: mpsc::Sender<T::Partial>,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            worker_id,
            transform,
            items,
            results,
            shutdown_rx,
        }
    }

    pub(crate) fn worker_id(&self) -> u16 {
        self.worker_id
    }

    /// Runs the take/transform/put loop to completion.
    pub(crate) async fn run(mut self) -> TrawlResult<()> {
        debug!("scan worker started");

        loop {
            let item = tokio::select! {
                biased;
                _ = self.shutdown_rx.signaled() => {
                    debug!("scan worker observed shutdown");
                    break;
                }
                item = recv_shared(&self.items) => match item {
                    Some(item) => item,
                    None => {
                        debug!("item channel closed and drained");
                        break;
                    }
                },
            };

            let Some(partial) = self.transform.apply(item) else {
                continue;
            };

            let delivered = tokio::select! {
                biased;
                _ = self.shutdown_rx.signaled() => false,
                res = self.results.send(partial) => res.is_ok(),
            };

            if !delivered {
                // Shutdown won the race or the reduce worker hung up; the
                // computed partial is dropped (best-effort cancellation).
                debug!("scan worker dropped an undeliverable partial result");
                break;
            }
        }

        debug!("scan worker exiting");

        Ok(())
    }
}

/// Receives the next item from the shared channel.
async fn recv_shared<I>(items: &SharedReceiver<I>) -> Option<I> {
    items.lock().await.recv().await
}
