use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{Instrument, info};

use crate::error::{ErrorKind, TrawlResult};
use crate::pipeline::PipelineId;
use crate::source::{Feed, Source};
use crate::trawl_error;
use crate::workers::base::{Worker, WorkerHandle, WorkerType};

/// Handle for monitoring the produce worker.
///
/// [`ProduceWorkerHandle`] enables waiting for the worker that drives the
/// source and surfaces its final result, properly classifying panics that
/// might occur within the worker task.
#[derive(Debug)]
pub struct ProduceWorkerHandle {
    handle: Option<JoinHandle<TrawlResult<()>>>,
}

impl WorkerHandle for ProduceWorkerHandle {
    type Output = ();

    fn wait(mut self) -> impl Future<Output = TrawlResult<()>> + Send {
        async move {
            let Some(handle) = self.handle.take() else {
                return Ok(());
            };

            handle.await.map_err(|err| {
                if err.is_cancelled() {
                    trawl_error!(
                        ErrorKind::ProduceWorkerCancelled,
                        "Produce worker was cancelled",
                        err
                    )
                } else {
                    trawl_error!(ErrorKind::ProduceWorkerPanic, "Produce worker panicked", err)
                }
            })??;

            Ok(())
        }
    }
}

/// Worker that drives a [`Source`] over the bounded item channel.
///
/// The worker consumes the source and feeds its items downstream until the
/// stream is exhausted or the feed stops accepting items. A source error is
/// surfaced through the handle; the channel sender is dropped on every exit
/// path so the scan workers always observe a closed channel.
pub struct ProduceWorker<S: Source> {
    pipeline_id: PipelineId,
    source: S,
    feed: Feed<S::Item>,
}

impl<S: Source> ProduceWorker<S> {
    /// Creates a new produce worker for the given source and feed.
    pub(crate) fn new(pipeline_id: PipelineId, source: S, feed: Feed<S::Item>) -> Self {
        Self {
            pipeline_id,
            source,
            feed,
        }
    }
}

impl<S: Source> Worker<ProduceWorkerHandle> for ProduceWorker<S> {
    type Error = crate::error::TrawlError;

    fn start(self) -> Result<ProduceWorkerHandle, Self::Error> {
        info!("starting produce worker");

        let span = WorkerType::Produce.span(self.pipeline_id);
        let produce_worker = async move {
            self.source.produce(self.feed).await?;

            info!("produce worker completed successfully");

            Ok(())
        }
        .instrument(span.or_current());

        let handle = tokio::spawn(produce_worker);

        Ok(ProduceWorkerHandle {
            handle: Some(handle),
        })
    }
}
