use std::future::Future;
use std::path::PathBuf;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::concurrency::stream::BatchStream;
use crate::error::{ErrorKind, TrawlResult};
use crate::source::base::{Feed, Source};
use crate::trawl_error;

/// Finite source reading a line-oriented file in fixed-size batches.
///
/// Lines are grouped into batches of at most `batch_size`; a partial final
/// batch is still emitted. The file handle is dropped on every exit path.
#[derive(Debug)]
pub struct LineBatchSource {
    path: PathBuf,
    batch_size: usize,
}

impl LineBatchSource {
    /// Creates a new source for the file at `path`.
    ///
    /// `batch_size` must be non-zero; configuration validation enforces this
    /// before the pipeline starts.
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            path: path.into(),
            batch_size,
        }
    }
}

impl Source for LineBatchSource {
    type Item = Vec<String>;

    fn produce(self, mut feed: Feed<Vec<String>>) -> impl Future<Output = TrawlResult<()>> + Send {
        async move {
            let file = File::open(&self.path).await.map_err(|err| {
                trawl_error!(
                    ErrorKind::SourceOpenFailed,
                    "Failed to open input file",
                    detail = self.path.display().to_string(),
                    source: err
                )
            })?;

            let lines = BufReader::new(file).lines();
            let line_stream = futures::stream::unfold(lines, |mut lines| async move {
                lines
                    .next_line()
                    .await
                    .transpose()
                    .map(|line| (line, lines))
            });
            let mut batches = Box::pin(BatchStream::wrap(line_stream, self.batch_size));

            let mut emitted = 0usize;
            while let Some(batch) = batches.next().await {
                let batch: Vec<String> =
                    batch.into_iter().collect::<Result<_, _>>().map_err(|err| {
                        trawl_error!(
                            ErrorKind::SourceReadFailed,
                            "Failed to read input file",
                            detail = self.path.display().to_string(),
                            source: err
                        )
                    })?;

                if !feed.send(batch).await {
                    debug!("downstream stopped accepting batches, closing input file");
                    return Ok(());
                }

                emitted += 1;
            }

            debug!(batches = emitted, "input file exhausted");

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::shutdown::create_shutdown_channel;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn missing_file_reports_acquisition_failure() {
        let (_shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let (tx, _rx) = mpsc::channel(4);
        let feed = Feed::new(tx, shutdown_rx);

        let source = LineBatchSource::new("/definitely/not/here.log", 10);
        let err = source.produce(feed).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SourceOpenFailed);
        assert_eq!(err.detail(), Some("/definitely/not/here.log"));
    }
}
