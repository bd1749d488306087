use tracing::{info, warn};
use trawl::jobs::keywords::{KeywordScan, KeywordTally};
use trawl::jobs::primes::{PrimePalindrome, PrimePalindromeCollect};
use trawl::pipeline::Pipeline;
use trawl::reduce::Reduce;
use trawl::source::Source;
use trawl::source::file::LineBatchSource;
use trawl::source::sequence::SequenceSource;
use trawl::transform::Transform;

use crate::config::{ScannerArgs, ScannerCommand, load_pipeline_config};
use crate::error::ScannerResult;

/// Runs the selected scan job to completion and prints its report.
pub async fn run_scanner(args: ScannerArgs) -> ScannerResult<()> {
    let mut config = load_pipeline_config(args.config.as_deref())?;

    match args.command {
        ScannerCommand::Logs {
            path,
            keywords,
            batch_size,
            workers,
        } => {
            if let Some(workers) = workers {
                config.worker_count = workers;
            }
            if let Some(batch_size) = batch_size {
                config.batch.max_size = batch_size;
            }
            config.validate()?;

            info!(path = %path.display(), "scanning log file for keywords");

            let source = LineBatchSource::new(&path, config.batch.max_size);
            let id = config.id;
            let pipeline = Pipeline::new(
                id,
                config,
                source,
                KeywordScan::new(keywords),
                KeywordTally::new(),
            );

            let tally = run_pipeline(pipeline).await?;

            if tally.is_empty() {
                println!("no matches found");
            } else {
                for entry in tally {
                    println!("{}: {}", entry.keyword, entry.count);
                }
            }
        }
        ScannerCommand::Primes {
            count,
            start,
            workers,
        } => {
            if let Some(workers) = workers {
                config.worker_count = workers;
            }
            config.validate()?;

            info!(count, start, "searching for prime palindromes");

            let id = config.id;
            let pipeline = Pipeline::new(
                id,
                config,
                SequenceSource::new(start),
                PrimePalindrome,
                PrimePalindromeCollect::new(count as usize),
            );

            let report = run_pipeline(pipeline).await?;

            println!("Prime palindromic numbers:");
            println!(
                "{}",
                report
                    .values
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            println!("Sum: {}", report.sum);
        }
    }

    Ok(())
}

/// Starts the pipeline, wires Ctrl-C to its shutdown signal, and waits.
async fn run_pipeline<S, T, R>(mut pipeline: Pipeline<S, T, R>) -> ScannerResult<R::Output>
where
    S: Source,
    T: Transform<Item = S::Item>,
    R: Reduce<Partial = T::Partial>,
{
    pipeline.start()?;

    // Ctrl-C raises the shutdown signal; the pipeline then drains its workers
    // and reports whatever was collected up to that point.
    let shutdown_tx = pipeline.shutdown_tx();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("received Ctrl-C, shutting down the pipeline");
            shutdown_tx.shutdown();
        }
    });

    Ok(pipeline.wait().await?)
}
