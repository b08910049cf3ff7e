//! Integration tests for the append-only log sinks.

use std::path::PathBuf;

use retrace::prelude::*;
use retrace::report::text::DELIMITER;
use retrace::{Error, append_to_file};

fn read(path: &PathBuf) -> String {
    std::fs::read_to_string(path).expect("log file should exist")
}

#[tokio::test]
async fn test_two_appends_keep_both_entries_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.log");

    append_to_file(&path, "first entry").await.unwrap();
    append_to_file(&path, "second entry").await.unwrap();

    assert_eq!(read(&path), "first entry\nsecond entry\n");
}

#[tokio::test]
async fn test_existing_content_is_never_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("existing.log");
    std::fs::write(&path, "kept from a previous run\n").unwrap();

    append_to_file(&path, "new").await.unwrap();

    assert_eq!(read(&path), "kept from a previous run\nnew\n");
}

#[tokio::test]
async fn test_failed_write_leaves_prior_content_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stable.log");
    append_to_file(&path, "before").await.unwrap();

    // A directory cannot be opened for appending.
    let err = append_to_file(dir.path(), "never written").await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    assert_eq!(read(&path), "before\n");
}

#[tokio::test]
async fn test_log_failures_to_default_path() {
    let dir = tempfile::tempdir().unwrap();
    let sink = LogSink::new(dir.path());
    let aggregator = FailureAggregator::new();
    aggregator.append(CapturedFailure::new("svc::Timeout", "first run", "at a"));

    sink.log_failures(&aggregator.snapshot(), None).await.unwrap();
    aggregator.append(CapturedFailure::new("svc::Refused", "second run", "at b"));
    sink.log_failures(&aggregator.snapshot()[1..], None).await.unwrap();

    let content = read(&dir.path().join("Exceptions.log"));
    assert_eq!(content.matches(DELIMITER).count(), 2);
    assert!(content.find("first run").unwrap() < content.find("second run").unwrap());
    assert!(content.contains("Exception: svc::Refused\nMessage: second run\nStackTrace: at b\n"));
}

#[tokio::test]
async fn test_log_failures_to_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let sink = LogSink::new(dir.path());
    let explicit = dir.path().join("custom.log");

    sink.log_failures(&[CapturedFailure::new("K", "m", "")], Some(&explicit))
        .await
        .unwrap();

    assert!(explicit.exists());
    assert!(!sink.failure_log_path().exists());
}

#[tokio::test]
async fn test_write_entry_uses_timestamped_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let sink = LogSink::new(dir.path());

    let path = sink.write_entry("job started", None).await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with(".log"));
    // yyyyMMdd_HHmmss.log
    assert_eq!(name.len(), "20240101_000000.log".len());
    assert_eq!(&name[8..9], "_");
    assert!(name[..8].chars().all(|c| c.is_ascii_digit()));

    let content = read(&path);
    assert!(content.contains("Entry: job started\n"));
    assert!(content.contains(DELIMITER));
}

#[tokio::test]
async fn test_background_writer_reports_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("background.log");
    let writer = LogWriter::spawn(4);

    let failures = vec![CapturedFailure::new("K", "queued failure", "")];
    let ticket = writer.submit(&path, failures.to_log_text()).await.unwrap();
    ticket.wait().await.unwrap();

    assert!(read(&path).contains("Message: queued failure"));
    writer.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_background_writer_surfaces_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let writer = LogWriter::spawn(4);

    let ticket = writer.submit(dir.path(), "cannot append to a directory").await.unwrap();

    assert!(matches!(ticket.wait().await, Err(Error::Io(_))));
    writer.shutdown().await.unwrap();
}
