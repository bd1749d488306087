//! Scan pipeline binary.
//!
//! Runs one of the two built-in scan jobs over the trawl pipeline: keyword
//! frequencies of a log file, or the first N prime palindromes. Includes
//! tracing setup, Ctrl-C handling, and plain-stdout result rendering.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::ScannerArgs;
use crate::core::run_scanner;
use crate::error::ScannerResult;

mod config;
mod core;
mod error;

/// Entry point for the scanner binary.
///
/// Parses arguments, initializes tracing, starts the async runtime, and runs
/// the selected scan job. Errors are rendered once at this boundary.
fn main() -> ScannerResult<()> {
    let args = ScannerArgs::parse();

    init_tracing();

    // We start the runtime.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run_scanner(args))?;

    Ok(())
}

/// Initializes the tracing subscriber for terminal output.
///
/// Honors `RUST_LOG` when set and stays quiet (warnings only) otherwise, so
/// scan results remain the only stdout output by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
