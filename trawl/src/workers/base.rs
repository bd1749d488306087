use std::future::Future;

use tracing::{Span, info_span};

use crate::error::TrawlResult;
use crate::pipeline::PipelineId;

/// Classification of pipeline worker types with identifying properties.
///
/// [`WorkerType`] distinguishes the different categories of workers in a
/// pipeline run. It is used for logging: every worker runs inside the tracing
/// span derived from its type.
#[derive(Debug, Copy, Clone)]
pub enum WorkerType {
    /// Worker that drives the source over the bounded item channel.
    Produce,
    /// Worker that applies the transform to items pulled from the shared channel.
    Scan {
        /// Index of this worker within the pool.
        worker_id: u16,
    },
    /// Worker that folds partial results into the final accumulator.
    Reduce,
}

impl WorkerType {
    /// Returns the tracing span under which a worker of this type runs.
    pub fn span(&self, pipeline_id: PipelineId) -> Span {
        match self {
            WorkerType::Produce => info_span!("produce_worker", pipeline_id),
            WorkerType::Scan { worker_id } => {
                info_span!("scan_worker", pipeline_id, worker_id = *worker_id)
            }
            WorkerType::Reduce => info_span!("reduce_worker", pipeline_id),
        }
    }
}

/// Trait for background workers in the pipeline.
///
/// [`Worker`] defines the interface for starting background workers. Starting
/// a worker spawns its task and returns immediately with a handle that can be
/// used to wait for completion.
pub trait Worker<H>
where
    H: WorkerHandle,
{
    /// Error type returned when worker startup fails.
    type Error;

    /// Starts the worker and returns a handle for monitoring its execution.
    fn start(self) -> Result<H, Self::Error>;
}

/// Handle for waiting on a running worker.
///
/// The handle remains valid after the worker completes; waiting on it then
/// returns the already-produced result. The handle is consumed by the wait.
pub trait WorkerHandle {
    /// Value produced by the worker on successful completion.
    type Output;

    /// Waits for the worker to complete and returns the final result.
    ///
    /// Panics and external task cancellations inside the worker surface as
    /// classified errors rather than propagating the panic.
    fn wait(self) -> impl Future<Output = TrawlResult<Self::Output>> + Send;
}
