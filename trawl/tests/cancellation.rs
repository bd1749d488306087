use std::time::Duration;

use tokio::time::timeout;
use trawl::jobs::keywords::{KeywordScan, KeywordTally};
use trawl::jobs::primes::{
    PrimePalindrome, PrimePalindromeCollect, is_palindrome, is_prime,
};
use trawl::pipeline::Pipeline;
use trawl::source::file::LineBatchSource;
use trawl::source::sequence::SequenceSource;

use crate::common::{init_test_tracing, test_config, write_temp_log};

mod common;

/// Upper bound for one pipeline run; a deadlock fails the test instead of
/// hanging it.
const RUN_TIMEOUT: Duration = Duration::from_secs(30);

fn prime_pipeline(
    worker_count: u16,
    target: usize,
) -> Pipeline<SequenceSource, PrimePalindrome, PrimePalindromeCollect> {
    let config = test_config(worker_count, 100);

    Pipeline::new(
        config.id,
        config,
        SequenceSource::new(2),
        PrimePalindrome,
        PrimePalindromeCollect::new(target),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn external_shutdown_stops_an_unbounded_run() {
    init_test_tracing();

    // A target this large is unreachable within the test budget: only the
    // shutdown signal can end the run.
    let mut pipeline = prime_pipeline(4, 1_000_000);
    pipeline.start().unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    // Raising the signal twice must be a no-op the second time.
    pipeline.shutdown();
    pipeline.shutdown();

    let report = timeout(RUN_TIMEOUT, pipeline.wait())
        .await
        .expect("cancelled pipeline must stop in time")
        .unwrap();

    // Whatever was collected before the shutdown still qualifies.
    assert!(report.values.len() < 1_000_000);
    for value in &report.values {
        assert!(is_prime(*value) && is_palindrome(*value), "{value} must qualify");
    }
    assert_eq!(report.sum, report.values.iter().sum::<u64>());
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_after_completion_is_a_noop() {
    init_test_tracing();

    let mut pipeline = prime_pipeline(4, 3);
    let shutdown_tx = pipeline.shutdown_tx();

    pipeline.start().unwrap();

    let report = timeout(RUN_TIMEOUT, pipeline.wait())
        .await
        .expect("pipeline must stop in time")
        .unwrap();
    assert_eq!(report.values.len(), 3);

    // Early termination already raised the signal; a deferred cancel after
    // completion must not panic, not double-close anything, and report that
    // the signal was already raised.
    assert!(!shutdown_tx.shutdown());
    assert!(!shutdown_tx.shutdown());
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_before_start_ends_the_run_immediately() {
    init_test_tracing();

    let mut pipeline = prime_pipeline(4, 1_000_000);

    // The signal is a level: components starting after the raise observe it
    // at their first blocking point and exit without doing work.
    pipeline.shutdown();
    pipeline.start().unwrap();

    let report = timeout(RUN_TIMEOUT, pipeline.wait())
        .await
        .expect("pipeline must stop in time")
        .unwrap();

    assert!(report.values.is_empty());
    assert_eq!(report.sum, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_runs_leave_no_stragglers() {
    init_test_tracing();

    // Early-terminating runs, back to back. Each one must wind down fully
    // within the timeout; a leaked or blocked worker would pile up and hang
    // one of the later iterations.
    for _ in 0..20 {
        let mut pipeline = prime_pipeline(4, 5);
        pipeline.start().unwrap();

        let report = timeout(RUN_TIMEOUT, pipeline.wait())
            .await
            .expect("pipeline must stop in time")
            .unwrap();

        assert_eq!(report.values.len(), 5);
    }

    // Finite runs through the file source as well.
    let path = write_temp_log(&["ERROR a", "INFO b", "ERROR c", "WARN d"]).await;
    for _ in 0..10 {
        let config = test_config(4, 2);
        let source = LineBatchSource::new(&path, config.batch.max_size);
        let mut pipeline = Pipeline::new(
            config.id,
            config,
            source,
            KeywordScan::new(vec!["ERROR".to_string(), "WARN".to_string()]),
            KeywordTally::new(),
        );

        pipeline.start().unwrap();

        let tally = timeout(RUN_TIMEOUT, pipeline.wait())
            .await
            .expect("pipeline must stop in time")
            .unwrap();

        assert_eq!(tally.len(), 2);
    }

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_and_wait_drains_in_one_call() {
    init_test_tracing();

    let mut pipeline = prime_pipeline(2, 1_000_000);
    pipeline.start().unwrap();

    let report = timeout(RUN_TIMEOUT, pipeline.shutdown_and_wait())
        .await
        .expect("cancelled pipeline must stop in time")
        .unwrap();

    for value in &report.values {
        assert!(is_prime(*value) && is_palindrome(*value), "{value} must qualify");
    }
}
