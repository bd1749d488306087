use std::mem;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span};

use crate::bail;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::concurrency::signal::create_signal;
use crate::config::PipelineConfig;
use crate::error::{ErrorKind, TrawlResult};
use crate::reduce::Reduce;
use crate::source::{Feed, Source};
use crate::transform::Transform;
use crate::trawl_error;
use crate::workers::base::{Worker, WorkerHandle};
use crate::workers::pool::ScanWorkerPool;
use crate::workers::produce::{ProduceWorker, ProduceWorkerHandle};
use crate::workers::reduce::{ReduceWorker, ReduceWorkerHandle};
use crate::workers::scan::ScanWorker;

/// Unique identifier for a pipeline run.
pub type PipelineId = u64;

enum PipelineState<S, T, R: Reduce> {
    NotStarted {
        source: S,
        transform: Arc<T>,
        reducer: R,
    },
    Started {
        produce_worker: ProduceWorkerHandle,
        pool: ScanWorkerPool,
        reduce_worker: ReduceWorkerHandle<R::Output>,
        supervisor: JoinHandle<()>,
    },
    Stopped,
}

/// A cancellable, backpressure-bounded scan pipeline.
///
/// [`Pipeline`] owns the channel topology, the shutdown signal, and the
/// lifecycle of every worker of one run: a produce worker driving the
/// [`Source`], a fixed pool of scan workers applying the [`Transform`], and a
/// reduce worker folding partial results with the [`Reduce`] policy. A run
/// moves from not-started through running into stopped exactly once; no state
/// persists across runs.
pub struct Pipeline<S, T, R: Reduce> {
    id: PipelineId,
    config: Arc<PipelineConfig>,
    state: PipelineState<S, T, R>,
    shutdown_tx: ShutdownTx,
}

impl<S, T, R> Pipeline<S, T, R>
where
    S: Source,
    T: Transform<Item = S::Item>,
    R: Reduce<Partial = T::Partial>,
{
    /// Creates a new pipeline in the not-started state.
    pub fn new(
        id: PipelineId,
        config: PipelineConfig,
        source: S,
        transform: T,
        reducer: R,
    ) -> Self {
        // We create the shutdown channel here so that callers can wire
        // external cancellation (such as Ctrl-C) before the pipeline starts.
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            id,
            config: Arc::new(config),
            state: PipelineState::NotStarted {
                source,
                transform: Arc::new(transform),
                reducer,
            },
            shutdown_tx,
        }
    }

    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Returns a clone of the shutdown transmitter for external cancellation.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Validates the configuration and starts every pipeline stage.
    ///
    /// Components start in dependency order: the reduce worker first, so the
    /// result channel is drained from the moment the first scan worker runs;
    /// then the supervisor, then all scan workers, and the source last. An
    /// invalid configuration is rejected before anything is spawned.
    pub fn start(&mut self) -> TrawlResult<()> {
        self.config.validate()?;

        let (source, transform, reducer) =
            match mem::replace(&mut self.state, PipelineState::Stopped) {
                PipelineState::NotStarted {
                    source,
                    transform,
                    reducer,
                } => (source, transform, reducer),
                other => {
                    self.state = other;
                    bail!(ErrorKind::InvalidState, "Pipeline was already started");
                }
            };

        info!(
            pipeline_id = self.id,
            worker_count = self.config.worker_count,
            "starting pipeline"
        );

        let capacity = self.config.effective_queue_capacity();
        let (item_tx, item_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        let (done_tx, mut done_rx) = create_signal();

        // The reduce worker starts first: nothing may ever block on an
        // undrained result channel.
        let reduce_worker = ReduceWorker::new(self.id, reducer, result_rx, done_tx).start()?;

        // The supervisor converts the reduce worker's completion marker into
        // the shutdown raise. After a normal completion the raise is a no-op;
        // when the fold loop exits early it is what cancels the source and the
        // in-flight scan workers.
        let shutdown_tx = self.shutdown_tx.clone();
        let supervisor = tokio::spawn(
            async move {
                let _ = done_rx.changed().await;
                if shutdown_tx.shutdown() {
                    debug!("supervisor raised the shutdown signal");
                }
            }
            .instrument(info_span!("pipeline_supervisor", pipeline_id = self.id).or_current()),
        );

        // Scan workers start before the source, so items always have
        // consumers.
        let items = Arc::new(Mutex::new(item_rx));
        let mut pool = ScanWorkerPool::new(self.id);
        for worker_id in 0..self.config.worker_count {
            pool.spawn(ScanWorker::new(
                worker_id,
                transform.clone(),
                items.clone(),
                result_tx.clone(),
                self.shutdown_tx.subscribe(),
            ));
        }

        // The scan workers now hold the only result senders: the result
        // channel closes exactly when the pool has fully drained.
        drop(result_tx);

        // The source starts last.
        let feed = Feed::new(item_tx, self.shutdown_tx.subscribe());
        let produce_worker = ProduceWorker::new(self.id, source, feed).start()?;

        self.state = PipelineState::Started {
            produce_worker,
            pool,
            reduce_worker,
            supervisor,
        };

        Ok(())
    }

    /// Waits for the pipeline to stop and returns the final accumulator.
    ///
    /// Waits on the produce worker first, then the scan worker pool, then the
    /// reduce worker. The result channel can only close after the pool has
    /// fully drained, so it is never closed while a worker may still write to
    /// it. When this method returns, no worker of the run is left running or
    /// blocked.
    pub async fn wait(self) -> TrawlResult<R::Output> {
        let PipelineState::Started {
            produce_worker,
            mut pool,
            reduce_worker,
            supervisor,
        } = self.state
        else {
            bail!(ErrorKind::InvalidState, "Pipeline was not started");
        };

        info!("waiting for the produce worker to complete");

        let mut errors = vec![];

        // A failed source means no further items arrive; the scan workers
        // drain whatever is already queued and exit on the closed item
        // channel, so the run still winds down in order.
        if let Err(err) = produce_worker.wait().await {
            errors.push(err);
        }

        info!("waiting for scan workers to complete");

        if let Err(err) = pool.wait_all().await {
            let errors_number = err.kinds().len();
            errors.push(err);

            info!("{} scan workers failed with an error", errors_number);
        }

        info!("waiting for the reduce worker to complete");

        let output = match reduce_worker.wait().await {
            Ok(output) => Some(output),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        // The supervisor exits after the reduce worker announces fold
        // completion; a panicked reduce worker drops its signal sender, which
        // also wakes it.
        if let Err(err) = supervisor.await {
            errors.push(trawl_error!(
                ErrorKind::Unknown,
                "Pipeline supervisor panicked",
                err
            ));
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let Some(output) = output else {
            bail!(ErrorKind::InvalidState, "Reduce worker returned no output");
        };

        info!("pipeline stopped");

        Ok(output)
    }

    /// Raises the shutdown signal for this run.
    ///
    /// Raising the signal any number of times is safe: only the first call
    /// has an effect, later calls (including after completion) are no-ops.
    pub fn shutdown(&self) {
        info!("trying to shut down the pipeline");

        if self.shutdown_tx.shutdown() {
            info!("shutdown signal sent to all pipeline workers");
        } else {
            debug!("shutdown signal was already raised");
        }
    }

    /// Raises the shutdown signal and waits for the pipeline to stop.
    pub async fn shutdown_and_wait(self) -> TrawlResult<R::Output> {
        self.shutdown();
        self.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::primes::{PrimePalindrome, PrimePalindromeCollect};
    use crate::source::sequence::SequenceSource;

    fn test_pipeline(
        target: usize,
    ) -> Pipeline<SequenceSource, PrimePalindrome, PrimePalindromeCollect> {
        // One worker keeps result arrival order deterministic for assertions.
        let config = PipelineConfig {
            worker_count: 1,
            ..Default::default()
        };

        Pipeline::new(
            1,
            config,
            SequenceSource::new(2),
            PrimePalindrome,
            PrimePalindromeCollect::new(target),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn starting_twice_is_rejected() {
        let mut pipeline = test_pipeline(1);

        pipeline.start().unwrap();
        let err = pipeline.start().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        // The first start is still intact and the run finishes normally.
        let report = pipeline.wait().await.unwrap();
        assert_eq!(report.values, vec![2]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn waiting_without_start_is_rejected() {
        let pipeline = test_pipeline(1);

        let err = pipeline.wait().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_config_is_rejected_before_spawning() {
        let config = PipelineConfig {
            worker_count: 0,
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(
            1,
            config,
            SequenceSource::new(2),
            PrimePalindrome,
            PrimePalindromeCollect::new(1),
        );

        let err = pipeline.start().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigError);
    }
}
