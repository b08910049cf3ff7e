//! Retry policy: attempt budget and inter-attempt wait.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How many times to retry and how long to wait between attempts.
///
/// `max_retries` counts attempts *beyond* the first: a policy with
/// `max_retries == 3` allows up to 4 attempts in total, and `0` means a
/// single attempt with no waiting.
///
/// The default is a single attempt with no wait.
///
/// # Examples
///
/// ```rust
/// use retrace_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_retries(5)
///     .wait_between_retries(Duration::from_secs(2))
///     .build();
///
/// assert_eq!(policy.max_attempts(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetryPolicy {
    max_retries: u32,
    #[serde(with = "duration_secs")]
    wait_between_retries: Duration,
}

impl RetryPolicy {
    /// Create a policy from its two parameters.
    pub fn new(max_retries: u32, wait_between_retries: Duration) -> Self {
        Self {
            max_retries,
            wait_between_retries,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::default()
    }

    /// Create a new builder for configuring a policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Build a policy from a fractional number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicy`] if `wait_secs` is negative, NaN or
    /// too large to represent as a [`Duration`].
    pub fn try_from_secs_f64(max_retries: u32, wait_secs: f64) -> Result<Self> {
        let wait = Duration::try_from_secs_f64(wait_secs).map_err(|e| {
            Error::InvalidPolicy(format!("wait of {wait_secs} seconds is not usable: {e}"))
        })?;
        Ok(Self::new(max_retries, wait))
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts allowed, including the first.
    pub fn max_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }

    /// Wait between a failed attempt and the next one.
    pub fn wait_between_retries(&self) -> Duration {
        self.wait_between_retries
    }
}

/// Builder for configuring a [`RetryPolicy`].
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_retries: Option<u32>,
    wait_between_retries: Option<Duration>,
}

impl RetryPolicyBuilder {
    /// Set the number of retries after the first attempt.
    ///
    /// Default: 0
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the wait between attempts.
    ///
    /// Default: zero
    pub fn wait_between_retries(mut self, wait: Duration) -> Self {
        self.wait_between_retries = Some(wait);
        self
    }

    /// Build the policy, using defaults for anything unset.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(0),
            wait_between_retries: self.wait_between_retries.unwrap_or(Duration::ZERO),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
