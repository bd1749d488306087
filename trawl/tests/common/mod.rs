use std::path::PathBuf;
use std::sync::Once;

use rand::random;
use trawl::config::{BatchConfig, PipelineConfig};
use tracing_subscriber::EnvFilter;

/// Initializes tracing once for the whole test binary.
///
/// Honors `RUST_LOG` when set and defaults to `info` otherwise.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Builds a pipeline configuration with a random id for one test run.
pub fn test_config(worker_count: u16, batch_size: usize) -> PipelineConfig {
    PipelineConfig {
        id: random(),
        worker_count,
        queue_capacity: None,
        batch: BatchConfig {
            max_size: batch_size,
        },
    }
}

/// Writes the given lines to a uniquely named file in the temp directory.
pub async fn write_temp_log<S: AsRef<str>>(lines: &[S]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("trawl-test-{}.log", random::<u64>()));
    let contents = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    tokio::fs::write(&path, contents).await.unwrap();

    path
}
