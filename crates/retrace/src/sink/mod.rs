//! Append-only log file sinks.
//!
//! [`append_to_file`] is the single write primitive: open in append mode,
//! write once, flush, release. [`LogSink`] adds default paths and report
//! rendering on top, and [`LogWriter`] moves writes onto a background task
//! with an explicit completion channel.
//!
//! Concurrent writers to one path (threads or processes) may interleave at
//! the OS level, including inside one large payload: `tokio::fs::File`
//! issues big buffers as several blocking writes. No locking is provided
//! across processes.

mod writer;

pub use writer::{LogTicket, LogWriter};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use retrace_core::CapturedFailure;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::RetraceConfig;
use crate::error::Result;
use crate::report::text;

/// Format of the default file name used by [`LogSink::write_entry`].
pub const ENTRY_FILE_FORMAT: &str = "%Y%m%d_%H%M%S.log";

/// Append `text` and a line terminator to the file at `path`.
///
/// The file is created if missing and never truncated. The payload is handed
/// to one `write_all` call, which is not atomic: large payloads reach the OS
/// in several writes. The handle is dropped on every return path, including
/// write failures. I/O errors propagate to the caller.
pub async fn append_to_file(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    let mut payload = String::with_capacity(text.len() + 1);
    payload.push_str(text);
    payload.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(payload.as_bytes()).await?;
    file.flush().await?;

    debug!(path = %path.display(), bytes = payload.len(), "appended to log file");
    Ok(())
}

/// Writes failure reports and free-form entries into a log directory.
///
/// # Examples
///
/// ```rust,no_run
/// use retrace::prelude::*;
///
/// # async fn example() -> retrace::Result<()> {
/// let sink = LogSink::new("/var/log/myjob");
/// let aggregator = FailureAggregator::new();
/// // ... run operations with retries ...
/// sink.log_failures(&aggregator.snapshot(), None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LogSink {
    log_dir: PathBuf,
    failure_log_name: String,
}

impl LogSink {
    /// Create a sink rooted at `log_dir`, using the default failure log name.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            failure_log_name: RetraceConfig::DEFAULT_FAILURE_LOG.to_string(),
        }
    }

    /// Create a sink from resolved configuration.
    pub fn from_config(config: &RetraceConfig) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            failure_log_name: config.failure_log_name.clone(),
        }
    }

    /// Directory that default paths resolve into.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Default destination for failure reports.
    pub fn failure_log_path(&self) -> PathBuf {
        self.log_dir.join(&self.failure_log_name)
    }

    /// Default destination for an entry written at `now`.
    pub fn entry_log_path(&self, now: DateTime<Local>) -> PathBuf {
        self.log_dir.join(now.format(ENTRY_FILE_FORMAT).to_string())
    }

    /// Append failures as log blocks.
    ///
    /// Writes to `path`, or to [`LogSink::failure_log_path`] when `None`.
    /// Empty input writes nothing and does not touch the file.
    pub async fn log_failures(
        &self,
        failures: &[CapturedFailure],
        path: Option<&Path>,
    ) -> Result<()> {
        if failures.is_empty() {
            return Ok(());
        }
        let path = path.map_or_else(|| self.failure_log_path(), Path::to_path_buf);
        append_to_file(&path, &text::to_log_text(failures)).await
    }

    /// Append a free-form entry block and return the file it went to.
    ///
    /// Without an explicit `path` the file name is derived from the current
    /// local time, so each second gets its own file.
    pub async fn write_entry(&self, entry: &str, path: Option<&Path>) -> Result<PathBuf> {
        let now = Local::now();
        let path = path.map_or_else(|| self.entry_log_path(now), Path::to_path_buf);
        append_to_file(&path, &text::entry_block_at(entry, now)).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_paths() {
        let sink = LogSink::new("/tmp/logs");
        assert_eq!(sink.failure_log_path(), PathBuf::from("/tmp/logs/Exceptions.log"));

        let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            sink.entry_log_path(now),
            PathBuf::from("/tmp/logs/20240102_030405.log")
        );
    }

    #[test]
    fn test_from_config_uses_configured_name() {
        let config = RetraceConfig::default()
            .with_log_dir("/srv/app")
            .with_failure_log_name("failures.log");
        let sink = LogSink::from_config(&config);

        assert_eq!(sink.failure_log_path(), PathBuf::from("/srv/app/failures.log"));
    }

    #[tokio::test]
    async fn test_append_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.log");

        append_to_file(&path, "hello").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn test_large_payload_is_appended_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.log");
        let big = "x".repeat(3 * 1024 * 1024);

        append_to_file(&path, "head").await.unwrap();
        append_to_file(&path, &big).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.len(), "head\n".len() + big.len() + 1);
        assert!(content.starts_with("head\nxxx"));
        assert!(content.ends_with("x\n"));
    }

    #[tokio::test]
    async fn test_append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.log");

        let err = append_to_file(&path, "hello").await.unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[tokio::test]
    async fn test_log_failures_skips_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path());

        sink.log_failures(&[], None).await.unwrap();
        assert!(!sink.failure_log_path().exists());
    }
}
