//! Bounded retry execution.
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - how many retries and how long to wait between them
//! - [`RetryExecutor`] - runs an operation under a policy, capturing failures
//! - [`RetryOutcome`] - success with prior failures, or exhaustion
//!
//! # Examples
//!
//! ```rust
//! use retrace_core::retry::{RetryExecutor, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::builder()
//!     .max_retries(3)
//!     .wait_between_retries(Duration::from_millis(100))
//!     .build();
//!
//! let value = RetryExecutor::new(policy)
//!     .execute(|| async {
//!         // Your operation here
//!         Ok::<_, std::io::Error>(42)
//!     }, None)
//!     .await
//!     .into_result()?;
//! # Ok(())
//! # }
//! ```

mod executor;
mod outcome;
mod policy;

pub use executor::{RetryExecutor, execute_with_retry};
pub use outcome::{RetryExhausted, RetryOutcome};
pub use policy::{RetryPolicy, RetryPolicyBuilder};
