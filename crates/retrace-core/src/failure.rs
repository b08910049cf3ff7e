//! The captured record of a single failed attempt.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind recorded for attempts that panicked instead of returning an error.
pub const PANIC_KIND: &str = "panic";

/// Immutable record of one failure occurrence.
///
/// The `kind` is a plain tag captured at the point of failure. For failures
/// built with [`CapturedFailure::from_error`] it is the fully-qualified type
/// name of the error, so filtering by kind is an equality check on a string.
///
/// # Examples
///
/// ```rust
/// use retrace_core::CapturedFailure;
///
/// let err = std::io::Error::other("disk full");
/// let failure = CapturedFailure::from_error(&err);
///
/// assert_eq!(failure.kind(), std::any::type_name::<std::io::Error>());
/// assert_eq!(failure.message(), "disk full");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedFailure {
    kind: String,
    message: String,
    trace: String,
    timestamp: DateTime<Utc>,
}

impl CapturedFailure {
    /// Create a failure record stamped with the current time.
    pub fn new(
        kind: impl Into<String>,
        message: impl Into<String>,
        trace: impl Into<String>,
    ) -> Self {
        Self::at(kind, message, trace, Utc::now())
    }

    /// Create a failure record with an explicit timestamp.
    pub fn at(
        kind: impl Into<String>,
        message: impl Into<String>,
        trace: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: trace.into(),
            timestamp,
        }
    }

    /// Capture an error value.
    ///
    /// The trace lists the `source()` chain, one `caused by:` line per cause,
    /// followed by a backtrace of the capture site when `RUST_BACKTRACE` or
    /// `RUST_LIB_BACKTRACE` enables one.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: Error + 'static,
    {
        let mut trace = String::new();
        let mut source = error.source();
        while let Some(cause) = source {
            if !trace.is_empty() {
                trace.push('\n');
            }
            let _ = write!(trace, "caused by: {cause}");
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            if !trace.is_empty() {
                trace.push('\n');
            }
            let _ = write!(trace, "{backtrace}");
        }

        Self::new(std::any::type_name::<E>(), error.to_string(), trace)
    }

    /// Capture the payload of a panicking attempt.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "attempt panicked".to_string()
        };
        Self::new(PANIC_KIND, message, String::new())
    }

    /// Fully-qualified failure type name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Human-readable failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Opaque call-stack or cause-chain text.
    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// When the failure was captured.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for CapturedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
