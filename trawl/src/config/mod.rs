//! Configuration objects for trawl pipelines.
//!
//! This module contains re-exported configurations that are needed by the
//! pipeline engine.

// Re-exports.
pub use trawl_config::shared::*;
