use tokio::task::JoinSet;
use tracing::{Instrument, debug, error};

use crate::error::{ErrorKind, TrawlResult};
use crate::pipeline::PipelineId;
use crate::transform::Transform;
use crate::trawl_error;
use crate::workers::base::WorkerType;
use crate::workers::scan::ScanWorker;

/// Pool owning every scan worker task of one pipeline run.
///
/// [`ScanWorkerPool`] spawns the fixed set of scan workers and provides the
/// single place to wait for all of them. The pool is considered fully drained
/// only when every worker task has exited; waiting collects worker errors and
/// converts panics into classified errors.
pub struct ScanWorkerPool {
    pipeline_id: PipelineId,
    join_set: JoinSet<(u16, TrawlResult<()>)>,
}

impl ScanWorkerPool {
    /// Creates a new empty scan worker pool.
    pub(crate) fn new(pipeline_id: PipelineId) -> Self {
        Self {
            pipeline_id,
            join_set: JoinSet::new(),
        }
    }

    /// Spawns a scan worker into the pool.
    pub(crate) fn spawn<T: Transform>(&mut self, worker: ScanWorker<T>) {
        let worker_id = worker.worker_id();
        let span = WorkerType::Scan { worker_id }.span(self.pipeline_id);

        self.join_set.spawn(
            async move {
                let result = worker.run().await;
                (worker_id, result)
            }
            .instrument(span.or_current()),
        );

        debug!(worker_id, "spawned scan worker in pool");
    }

    /// Waits for every scan worker in the pool to exit.
    ///
    /// This method blocks until the pool is fully drained. If any workers
    /// encounter errors, those errors are collected and returned aggregated.
    pub(crate) async fn wait_all(&mut self) -> TrawlResult<()> {
        let mut errors = Vec::new();

        while let Some(result) = self.join_set.join_next().await {
            match result {
                Ok((worker_id, Ok(()))) => {
                    debug!(worker_id, "scan worker completed");
                }
                Ok((worker_id, Err(err))) => {
                    error!(worker_id, error = %err, "scan worker completed with error");
                    errors.push(err);
                }
                Err(join_err) => {
                    if join_err.is_cancelled() {
                        debug!("scan worker task was cancelled");
                    } else {
                        errors.push(trawl_error!(
                            ErrorKind::ScanWorkerPanic,
                            "Scan worker panicked",
                            join_err
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}
