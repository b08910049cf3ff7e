//! Result of running an operation under a retry policy.

use std::fmt;

use crate::failure::CapturedFailure;

/// What happened across all attempts of one retry call.
///
/// Both variants carry the ordered failure history of *this call*, so a
/// success after two transient failures still reports those failures.
#[derive(Debug, Clone)]
#[must_use = "an exhausted outcome carries the failure history and should be handled"]
pub enum RetryOutcome<T> {
    /// An attempt completed. `failures` holds the attempts that failed first.
    Succeeded {
        /// Value produced by the successful attempt.
        value: T,
        /// Failed attempts that preceded the success, oldest first.
        failures: Vec<CapturedFailure>,
    },
    /// Every allowed attempt failed.
    Exhausted {
        /// One entry per attempt, oldest first.
        failures: Vec<CapturedFailure>,
    },
}

impl<T> RetryOutcome<T> {
    /// Whether an attempt eventually completed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Failures recorded during this call, oldest first.
    pub fn failures(&self) -> &[CapturedFailure] {
        match self {
            Self::Succeeded { failures, .. } | Self::Exhausted { failures } => failures,
        }
    }

    /// Number of attempts made.
    pub fn attempts(&self) -> usize {
        match self {
            Self::Succeeded { failures, .. } => failures.len() + 1,
            Self::Exhausted { failures } => failures.len(),
        }
    }

    /// The successful value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    /// Convert into a `Result`, discarding failures that preceded a success.
    ///
    /// # Errors
    ///
    /// Returns [`RetryExhausted`] with the full ordered history when every
    /// attempt failed.
    pub fn into_result(self) -> Result<T, RetryExhausted> {
        match self {
            Self::Succeeded { value, .. } => Ok(value),
            Self::Exhausted { failures } => Err(RetryExhausted { failures }),
        }
    }
}

/// Error returned when every allowed attempt failed.
///
/// Carries every captured failure, not just the last one, so transient and
/// persistent failure patterns can be told apart.
#[derive(Debug, Clone)]
pub struct RetryExhausted {
    failures: Vec<CapturedFailure>,
}

impl RetryExhausted {
    /// Every failed attempt, oldest first.
    pub fn failures(&self) -> &[CapturedFailure] {
        &self.failures
    }

    /// The final failed attempt.
    pub fn last(&self) -> Option<&CapturedFailure> {
        self.failures.last()
    }

    /// Take ownership of the failure history.
    pub fn into_failures(self) -> Vec<CapturedFailure> {
        self.failures
    }
}

impl fmt::Display for RetryExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation failed after {} attempt(s)", self.failures.len())?;
        if let Some(last) = self.last() {
            write!(f, "; last failure: {last}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RetryExhausted {}
