//! Background log writer.
//!
//! Callers hand text to a worker task and get a [`LogTicket`] back. Waiting
//! on the ticket is optional; a failed write that nobody waits for is still
//! reported through `tracing`.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::append_to_file;
use crate::error::{Error, Result};

/// Default queue depth for [`LogWriter::spawn`].
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

#[derive(Debug)]
struct WriteRequest {
    path: PathBuf,
    text: String,
    done: oneshot::Sender<Result<()>>,
}

/// Completion handle for one queued write.
#[derive(Debug)]
#[must_use = "drop the ticket explicitly if the write result is not needed"]
pub struct LogTicket {
    rx: oneshot::Receiver<Result<()>>,
}

impl LogTicket {
    /// Wait for the write to finish and return its result.
    ///
    /// # Errors
    ///
    /// The write's own I/O error, or [`Error::WorkerExited`] if the worker
    /// stopped before handling the request.
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::WorkerExited),
        }
    }
}

/// Handle to a background task that appends text to log files.
///
/// Requests are handled one at a time in submission order, so writes to the
/// same path land in the order they were submitted.
///
/// # Examples
///
/// ```rust,no_run
/// use retrace::sink::LogWriter;
///
/// # async fn example() -> retrace::Result<()> {
/// let writer = LogWriter::spawn(16);
/// let ticket = writer.submit("/tmp/job.log", "started").await?;
/// ticket.wait().await?;
/// writer.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LogWriter {
    tx: mpsc::Sender<WriteRequest>,
    task: JoinHandle<()>,
}

impl LogWriter {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// `queue_depth` bounds the number of pending writes; `submit` waits
    /// when the queue is full.
    pub fn spawn(queue_depth: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let task = tokio::spawn(run_worker(rx));
        Self { tx, task }
    }

    /// Queue `text` to be appended to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::WorkerExited`] if the worker is no longer running.
    pub async fn submit(
        &self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<LogTicket> {
        let (done, rx) = oneshot::channel();
        let request = WriteRequest {
            path: path.into(),
            text: text.into(),
            done,
        };
        if self.tx.send(request).await.is_err() {
            return Err(Error::WorkerExited);
        }
        Ok(LogTicket { rx })
    }

    /// Stop accepting requests, drain the queue, and wait for the worker.
    pub async fn shutdown(self) -> Result<()> {
        let Self { tx, task } = self;
        drop(tx);
        task.await.map_err(|e| Error::Other(e.into()))
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::spawn(DEFAULT_QUEUE_DEPTH)
    }
}

async fn run_worker(mut rx: mpsc::Receiver<WriteRequest>) {
    while let Some(WriteRequest { path, text, done }) = rx.recv().await {
        let result = append_to_file(&path, &text).await;
        if let Err(err) = &result {
            error!(path = %path.display(), error = %err, "background log write failed");
        }
        if done.send(result).is_err() {
            debug!(path = %path.display(), "log ticket dropped before completion");
        }
    }
    debug!("log writer stopped");
}
