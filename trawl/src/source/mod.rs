//! Source stage implementations for the pipeline.
//!
//! A source produces the ordered stream of work items and pushes them onto the
//! bounded item channel through a [`Feed`]. Sources stop producing as soon as the
//! feed stops accepting items, which happens on shutdown or when every scan worker
//! has hung up.

pub mod base;
pub mod file;
pub mod sequence;

pub use base::{Feed, Source};
