//! Error types for the retry core.

use thiserror::Error;

use crate::retry::RetryExhausted;

/// Result type alias for retry core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the retry core itself.
///
/// Failures of the caller's operation are never reported through this type
/// while retries remain; they are captured as [`crate::CapturedFailure`]s.
#[derive(Debug, Error)]
pub enum Error {
    /// Every allowed attempt failed.
    #[error(transparent)]
    Exhausted(#[from] RetryExhausted),

    /// A retry policy could not be built from the supplied values.
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),
}
