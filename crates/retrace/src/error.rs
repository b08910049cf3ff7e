//! Error types for retrace
//!
//! Failures of the caller's own operation are not errors of this crate; they
//! are captured as [`retrace_core::CapturedFailure`]s. This enum covers what
//! can go wrong while validating input, rendering, writing logs, or handing
//! a report to a mail transport.

use thiserror::Error;

/// Result type alias for retrace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for retrace.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the retry core.
    #[error(transparent)]
    Core(#[from] retrace_core::Error),

    /// A required argument was missing or empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic I/O error, e.g. opening or writing a log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The mail transport refused or failed to deliver a notification.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The background log writer stopped before completing a request.
    #[error("Log writer exited before completing the request")]
    WorkerExited,

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Shorthand for an input-validation error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Whether this error was raised by input validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

impl From<retrace_core::RetryExhausted> for Error {
    fn from(err: retrace_core::RetryExhausted) -> Self {
        Error::Core(err.into())
    }
}
