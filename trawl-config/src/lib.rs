//! Shared configuration types for trawl pipelines.

pub mod shared;
