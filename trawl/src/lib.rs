pub mod concurrency;
pub mod config;
pub mod error;
pub mod jobs;
pub mod pipeline;
pub mod reduce;
pub mod source;
pub mod transform;
pub mod workers;

mod macros;
