use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, info};

use crate::concurrency::signal::SignalTx;
use crate::error::{ErrorKind, TrawlResult};
use crate::pipeline::PipelineId;
use crate::reduce::{Fold, Reduce};
use crate::trawl_error;
use crate::workers::base::{Worker, WorkerHandle, WorkerType};

/// Handle for monitoring the reduce worker.
///
/// Waiting on the handle yields the final accumulator once the fold loop has
/// exited and the reducer has been consumed.
#[derive(Debug)]
pub struct ReduceWorkerHandle<O> {
    handle: JoinHandle<O>,
}

impl<O: Send + 'static> WorkerHandle for ReduceWorkerHandle<O> {
    type Output = O;

    fn wait(self) -> impl Future<Output = TrawlResult<O>> + Send {
        async move {
            self.handle.await.map_err(|err| {
                if err.is_cancelled() {
                    trawl_error!(
                        ErrorKind::ReduceWorkerCancelled,
                        "Reduce worker was cancelled",
                        err
                    )
                } else {
                    trawl_error!(ErrorKind::ReduceWorkerPanic, "Reduce worker panicked", err)
                }
            })
        }
    }
}

/// Worker draining the result channel into the final accumulator.
///
/// The reduce worker is the only task that ever touches the reducer; every
/// partial result that reaches the channel is merged exactly once, in arrival
/// order. The worker starts draining before any scan worker can block on a
/// full result channel and announces fold-loop exit through its completion
/// signal, which the supervisor converts into the shutdown raise.
pub struct ReduceWorker<R: Reduce> {
    pipeline_id: PipelineId,
    reducer: R,
    results: mpsc::Receiver<R::Partial>,
    done_tx: SignalTx,
}

impl<R: Reduce> ReduceWorker<R> {
    pub(crate) fn new(
        pipeline_id: PipelineId,
        reducer: R,
        results: mpsc::Receiver<R::Partial>,
        done_tx: SignalTx,
    ) -> Self {
        Self {
            pipeline_id,
            reducer,
            results,
            done_tx,
        }
    }

    async fn run(mut self) -> R::Output {
        info!("reduce worker started draining results");

        let mut accepting = true;
        while let Some(partial) = self.results.recv().await {
            if !accepting {
                // Target already met: keep draining so no scan worker can stay
                // blocked on a full result channel, but stop merging.
                continue;
            }

            if let Fold::Done = self.reducer.merge(partial) {
                accepting = false;

                info!("target condition met, announcing fold completion");
                let _ = self.done_tx.send(());
            }
        }

        // The result channel is closed and drained; the fold loop exits here
        // exactly once per run.
        let _ = self.done_tx.send(());

        info!("reduce worker completed");

        self.reducer.finish()
    }
}

impl<R: Reduce> Worker<ReduceWorkerHandle<R::Output>> for ReduceWorker<R> {
    type Error = crate::error::TrawlError;

    fn start(self) -> Result<ReduceWorkerHandle<R::Output>, Self::Error> {
        info!("starting reduce worker");

        let span = WorkerType::Reduce.span(self.pipeline_id);
        let handle = tokio::spawn(self.run().instrument(span.or_current()));

        Ok(ReduceWorkerHandle { handle })
    }
}
