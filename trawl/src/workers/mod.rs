//! Background workers that make up a pipeline run.
//!
//! A run consists of one produce worker driving the source, a fixed pool of
//! scan workers applying the transform in parallel, and one reduce worker
//! folding partial results into the final accumulator. All of them communicate
//! exclusively through the bounded item and result channels.

pub mod base;
pub mod pool;
pub mod produce;
pub mod reduce;
pub mod scan;
