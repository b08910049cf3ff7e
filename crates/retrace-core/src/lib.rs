#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the retrace workspace.
//!
//! This crate owns everything with a behavioral contract around retries:
//!
//! - **Captured failures** via [`CapturedFailure`], an immutable record of
//!   one failed attempt (kind, message, trace, timestamp)
//! - **Ordered aggregation** via [`FailureAggregator`], an append-only
//!   collection that can be shared across concurrent retry calls
//! - **Bounded retries** via [`RetryExecutor`] and [`RetryPolicy`]
//!
//! Rendering, file logging and notification live in the `retrace` crate.
//!
//! # Examples
//!
//! ```rust
//! use retrace_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let policy = RetryPolicy::builder()
//!     .max_retries(3)
//!     .wait_between_retries(Duration::from_millis(10))
//!     .build();
//!
//! let aggregator = FailureAggregator::new();
//! let outcome = RetryExecutor::new(policy)
//!     .execute(|| async { Ok::<_, std::io::Error>(42) }, Some(&aggregator))
//!     .await;
//!
//! assert!(outcome.is_success());
//! assert!(aggregator.is_empty());
//! # }
//! ```

pub mod aggregator;
pub mod error;
pub mod failure;
pub mod retry;

pub use aggregator::FailureAggregator;
pub use error::{Error, Result};
pub use failure::CapturedFailure;
pub use retry::{
    RetryExecutor, RetryExhausted, RetryOutcome, RetryPolicy, RetryPolicyBuilder,
    execute_with_retry,
};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use retrace_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregator::FailureAggregator;
    pub use crate::failure::CapturedFailure;
    pub use crate::retry::{
        RetryExecutor, RetryExhausted, RetryOutcome, RetryPolicy, execute_with_retry,
    };
}
