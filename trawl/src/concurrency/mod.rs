//! Concurrency utilities for coordinating pipeline operations.
//!
//! This module provides the fundamental concurrency primitives used by the pipeline
//! to coordinate its workers, handle graceful shutdown, and shape streaming data flows.
//! The design emphasizes predictable cleanup and deadlock-free operation.
//!
//! # Coordination Patterns
//!
//! ## Graceful Shutdown
//!
//! The [`shutdown`] module implements a broadcast-based shutdown pattern where:
//! 1. A single shutdown signal can terminate the source and every worker simultaneously
//! 2. The signal is raised at most once per run and is never lowered
//! 3. Every blocking channel operation in the source and scan workers races the signal,
//!    so no component can stay blocked past cancellation
//!
//! ## Worker Coordination
//!
//! The [`signal`] module provides a lightweight one-shot marker used by the reduce
//! worker to announce that its fold loop has exited, which is what allows the
//! pipeline to stop an unbounded source early.
//!
//! ## Stream Processing
//!
//! The [`stream`] module implements the batching adapter that groups a line stream
//! into fixed-size work items, emitting the partial final batch at end of input.

pub mod shutdown;
pub mod signal;
pub mod stream;
