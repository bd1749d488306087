use std::future::Future;

use tracing::debug;

use crate::error::TrawlResult;
use crate::source::base::{Feed, Source};

/// Infinite source emitting monotonically increasing integers.
///
/// The source has no natural end: it only stops because the feed stops
/// accepting items, which happens when the shutdown signal fires. The cursor
/// is the only state; generation is a pure function of it.
#[derive(Debug, Clone, Copy)]
pub struct SequenceSource {
    start: u64,
}

impl SequenceSource {
    /// Creates a new sequence starting at `start`.
    pub fn new(start: u64) -> Self {
        Self { start }
    }
}

impl Default for SequenceSource {
    /// Starts at 2, the first prime candidate.
    fn default() -> Self {
        Self::new(2)
    }
}

impl Source for SequenceSource {
    type Item = u64;

    fn produce(self, mut feed: Feed<u64>) -> impl Future<Output = TrawlResult<()>> + Send {
        async move {
            let mut candidate = self.start;

            while feed.send(candidate).await {
                candidate += 1;
            }

            debug!(last_candidate = candidate, "sequence source stopped");

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::shutdown::create_shutdown_channel;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[tokio::test]
    async fn emits_consecutive_candidates() {
        let (_shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let (tx, mut rx) = mpsc::channel(8);
        let feed = Feed::new(tx, shutdown_rx);

        let handle = tokio::spawn(SequenceSource::new(2).produce(feed));

        for expected in 2..7u64 {
            assert_eq!(rx.recv().await, Some(expected));
        }

        // Dropping the receiver makes the feed stop accepting items, which
        // ends the otherwise infinite source.
        drop(rx);
        timeout(Duration::from_secs(5), handle)
            .await
            .expect("source must stop after the channel closes")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn shutdown_unblocks_a_full_channel_write() {
        let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let (tx, _rx) = mpsc::channel(1);
        let feed = Feed::new(tx, shutdown_rx);

        // Nobody drains the channel, so the source blocks on its second send
        // until the shutdown signal wins the race.
        let handle = tokio::spawn(SequenceSource::new(2).produce(feed));

        shutdown_tx.shutdown();

        timeout(Duration::from_secs(5), handle)
            .await
            .expect("source must not block past cancellation")
            .unwrap()
            .unwrap();
    }
}
