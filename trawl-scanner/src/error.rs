use thiserror::Error;
use trawl::error::TrawlError;
use trawl_config::shared::ValidationError;

/// Result type for scanner operations.
pub type ScannerResult<T> = Result<T, ScannerError>;

/// Error type for the scanner binary.
///
/// Wraps [`TrawlError`] for pipeline errors and provides variants for
/// configuration and I/O errors raised at the binary boundary.
#[derive(Debug, Error)]
pub enum ScannerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] TrawlError),
    /// Configuration validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),
    /// Configuration file parsing error.
    #[error("configuration file error: {0}")]
    ConfigFile(#[from] serde_json::Error),
    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
