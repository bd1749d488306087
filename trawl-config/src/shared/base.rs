use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Worker count cannot be zero.
    #[error("`worker_count` cannot be zero")]
    WorkerCountZero,
    /// Batch size cannot be zero.
    #[error("`batch.max_size` cannot be zero")]
    BatchMaxSizeZero,
    /// Queue capacity must be able to hold one item per worker.
    #[error("`queue_capacity` ({capacity}) must be at least `worker_count` ({worker_count})")]
    QueueCapacityTooSmall {
        /// The configured queue capacity.
        capacity: usize,
        /// The configured worker count.
        worker_count: u16,
    },
}
