//! Example: retry a flaky operation, then report what went wrong
//!
//! This example demonstrates:
//! 1. Retrying with a fixed wait and a shared aggregator
//! 2. Rendering the failure history as JSON and HTML
//! 3. Appending log blocks, inline and through the background writer
//!
//! Run with:
//! ```bash
//! RUST_LOG=retrace=debug,retrace_core=debug cargo run -p retrace --example retry_report --features trace
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use retrace::observability::init_tracing;
use retrace::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("upstream returned 503 on attempt {0}")]
struct Unavailable(u32);

#[tokio::main]
async fn main() -> retrace::Result<()> {
    init_tracing("retrace=info,retrace_core=info");

    let log_dir = std::env::temp_dir().join("retrace-example");
    tokio::fs::create_dir_all(&log_dir).await?;
    let config = RetraceConfig::default()
        .with_log_dir(&log_dir)
        .with_retry(
            RetryPolicy::builder()
                .max_retries(3)
                .wait_between_retries(Duration::from_millis(200))
                .build(),
        );

    let aggregator = FailureAggregator::new();
    let executor = RetryExecutor::new(config.retry);

    println!("=== Flaky operation: succeeds on the third attempt ===");
    let calls = &AtomicU32::new(0);
    let outcome = executor
        .execute(
            move || async move {
                let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(Unavailable(attempt))
                } else {
                    Ok("payload")
                }
            },
            Some(&aggregator),
        )
        .await;
    println!(
        "  success={} attempts={} failures={}",
        outcome.is_success(),
        outcome.attempts(),
        outcome.failures().len()
    );

    println!("\n=== Broken operation: exhausts every attempt ===");
    let outcome = executor
        .execute(
            || async { Err::<(), _>(std::io::Error::other("connection refused")) },
            Some(&aggregator),
        )
        .await;
    println!("  success={} attempts={}", outcome.is_success(), outcome.attempts());

    println!("\n=== Aggregated history ===");
    for (kind, count) in aggregator.count_by_kind() {
        println!("  {count:>2} x {kind}");
    }

    println!("\n=== JSON report ===");
    println!("{}", aggregator.to_json()?);

    println!("\n=== HTML report (first 120 chars) ===");
    let html = aggregator.to_html();
    println!("{}", &html[..html.len().min(120)]);

    let sink = LogSink::from_config(&config);
    sink.log_failures(&aggregator.snapshot(), None).await?;
    println!("\nWrote {}", sink.failure_log_path().display());

    let writer = LogWriter::default();
    let entry_path = sink.entry_log_path(chrono::Local::now());
    writer
        .submit(&entry_path, format!("run finished with {} failures", aggregator.len()))
        .await?
        .wait()
        .await?;
    writer.shutdown().await?;
    println!("Wrote {}", entry_path.display());

    Ok(())
}
