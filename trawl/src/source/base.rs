use std::future::Future;

use tokio::sync::mpsc;

use crate::concurrency::shutdown::ShutdownRx;
use crate::error::TrawlResult;

/// Feeding half of the bounded item channel handed to a [`Source`].
///
/// [`Feed`] couples the item sender with the pipeline shutdown signal so that a
/// blocked write never outlives cancellation: the write races the signal and is
/// abandoned when shutdown fires first.
#[derive(Debug)]
pub struct Feed<I> {
    tx: mpsc::Sender<I>,
    shutdown_rx: ShutdownRx,
}

impl<I> Feed<I> {
    pub(crate) fn new(tx: mpsc::Sender<I>, shutdown_rx: ShutdownRx) -> Self {
        Self { tx, shutdown_rx }
    }

    /// Sends one work item downstream, racing the shutdown signal.
    ///
    /// Returns `false` when the item was not accepted: either shutdown fired
    /// while the bounded channel was full, or every scan worker already hung
    /// up. Sources must stop producing once this returns `false`.
    pub async fn send(&mut self, item: I) -> bool {
        tokio::select! {
            biased;
            _ = self.shutdown_rx.signaled() => false,
            res = self.tx.send(item) => res.is_ok(),
        }
    }
}

/// Trait for producers of the pipeline's work item stream.
///
/// A [`Source`] is consumed by the produce worker at pipeline start. It emits its
/// items one by one through the provided [`Feed`] and returns once the stream is
/// exhausted or the feed stops accepting items. Implementations must release any
/// held resource (such as an open file) on every exit path, including error exits.
///
/// Returning an error before the first item is the acquisition-failure path: the
/// pipeline completes with an empty result set and the error is reported once to
/// the caller.
pub trait Source: Send + 'static {
    /// The type of work item this source produces.
    type Item: Send + 'static;

    /// Produces the item stream, pushing each item onto `feed`.
    fn produce(self, feed: Feed<Self::Item>) -> impl Future<Output = TrawlResult<()>> + Send;
}
