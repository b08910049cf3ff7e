//! # retrace
//!
//! Run fallible operations with bounded retries, keep every failure in order,
//! and turn that history into reports.
//!
//! ## Features
//!
//! - **Bounded retries**: fixed wait between attempts, async or blocking
//!   operations, panics captured as failures
//! - **Ordered aggregation**: one append-only [`FailureAggregator`] can be
//!   shared across concurrent retry calls
//! - **Reports**: JSON, HTML table fragments and timestamped log blocks
//! - **Log files**: append-only writes, inline or on a background writer
//! - **Notifications**: validated hand-off of HTML reports to a mail transport
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use retrace::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> retrace::Result<()> {
//!     let config = RetraceConfig::default();
//!     let aggregator = FailureAggregator::new();
//!
//!     let policy = RetryPolicy::builder()
//!         .max_retries(3)
//!         .wait_between_retries(Duration::from_secs(2))
//!         .build();
//!
//!     let outcome = RetryExecutor::new(policy)
//!         .execute(|| async { std::fs::read_to_string("input.csv") }, Some(&aggregator))
//!         .await;
//!
//!     if !outcome.is_success() {
//!         LogSink::from_config(&config)
//!             .log_failures(&aggregator.snapshot(), None)
//!             .await?;
//!         println!("{}", aggregator.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod notify;
#[cfg(feature = "trace")]
pub mod observability;
pub mod report;
pub mod sink;

pub use config::RetraceConfig;
pub use error::{Error, Result};
pub use notify::{Envelope, MailTransport, Notification, Notifier, SmtpServerConfig};
pub use report::{FailureRecord, Report};
pub use sink::{LogSink, LogTicket, LogWriter, append_to_file};

// Re-export the retry core
pub use retrace_core::{
    CapturedFailure, FailureAggregator, RetryExecutor, RetryExhausted, RetryOutcome, RetryPolicy,
    execute_with_retry,
};

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::config::RetraceConfig;
    pub use crate::notify::{MailTransport, Notification, Notifier, SmtpServerConfig};
    pub use crate::report::Report;
    pub use crate::sink::{LogSink, LogWriter};
    pub use retrace_core::prelude::*;
}
