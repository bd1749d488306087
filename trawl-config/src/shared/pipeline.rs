use serde::{Deserialize, Serialize};

use crate::shared::{BatchConfig, ValidationError};

/// Configuration for a trawl pipeline.
///
/// Contains all settings required to run a scan pipeline: parallelism,
/// channel bounds, and batching parameters. Everything that is specific to a
/// single job (keywords, target counts) lives with the job itself, not here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The unique identifier for this pipeline.
    pub id: u64,
    /// Number of parallel scan workers, fixed for the lifetime of a run.
    #[serde(default = "default_worker_count")]
    pub worker_count: u16,
    /// Capacity of the bounded item and result channels.
    ///
    /// When unset, the capacity is derived from the worker count. A configured
    /// value must be able to hold at least one item per worker so that
    /// backpressure never degenerates into a lockstep hand-off.
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    /// Batch grouping configuration for line-oriented sources.
    #[serde(default)]
    pub batch: BatchConfig,
}

impl PipelineConfig {
    /// Default number of parallel scan workers.
    pub const DEFAULT_WORKER_COUNT: u16 = 4;

    /// Validates pipeline configuration settings.
    ///
    /// Checks worker count, batch settings, and the channel capacity bound.
    /// Invalid configuration is rejected before any part of the pipeline
    /// starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.worker_count == 0 {
            return Err(ValidationError::WorkerCountZero);
        }

        self.batch.validate()?;

        if let Some(capacity) = self.queue_capacity
            && capacity < self.worker_count as usize
        {
            return Err(ValidationError::QueueCapacityTooSmall {
                capacity,
                worker_count: self.worker_count,
            });
        }

        Ok(())
    }

    /// Returns the channel capacity to use for this run.
    ///
    /// Defaults to two slots per worker so a full pool always has items
    /// queued behind it.
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or(self.worker_count as usize * 2)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            id: 0,
            worker_count: default_worker_count(),
            queue_capacity: None,
            batch: BatchConfig::default(),
        }
    }
}

fn default_worker_count() -> u16 {
    PipelineConfig::DEFAULT_WORKER_COUNT
}
