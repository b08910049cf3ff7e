//! Failure report rendering.
//!
//! Three stateless renderers turn an ordered list of failures into text:
//!
//! - [`json::to_json`]: pretty-printed array of `{message, trace, kind}`
//! - [`html::to_html`]: heading plus one table, for notification bodies
//! - [`text::to_log_text`]: timestamped blocks for append-only log files
//!
//! Renderers never mutate their input and never fail on empty input. The
//! [`Report`] extension trait exposes all three on single failures, slices,
//! aggregators and exhausted retry results.
//!
//! # Security
//!
//! [`html::to_html`] inserts failure text verbatim, without escaping. A
//! message or trace that carries caller-controlled input becomes markup when
//! the fragment is shown in a browser. Escape upstream if failures can carry
//! untrusted text.

pub mod html;
pub mod json;
pub mod text;

pub use json::FailureRecord;

use retrace_core::{CapturedFailure, FailureAggregator, RetryExhausted};

use crate::error::Result;

/// Render anything that holds an ordered list of failures.
///
/// # Examples
///
/// ```rust
/// use retrace::prelude::*;
///
/// let aggregator = FailureAggregator::new();
/// aggregator.append(CapturedFailure::new("app::Timeout", "took too long", ""));
///
/// let json = aggregator.to_json().unwrap();
/// assert!(json.contains("\"kind\": \"app::Timeout\""));
///
/// let html = aggregator.to_html();
/// assert!(html.starts_with("<h2>Exceptions:</h2>"));
/// ```
pub trait Report {
    /// Call `f` with the failures to render, oldest first.
    fn with_failures<R>(&self, f: impl FnOnce(&[CapturedFailure]) -> R) -> R;

    /// Render as a pretty-printed JSON array.
    fn to_json(&self) -> Result<String> {
        self.with_failures(json::to_json)
    }

    /// Render as an HTML fragment. See the module docs on escaping.
    fn to_html(&self) -> String {
        self.with_failures(html::to_html)
    }

    /// Render as log blocks stamped with the current local time.
    fn to_log_text(&self) -> String {
        self.with_failures(text::to_log_text)
    }
}

impl Report for CapturedFailure {
    fn with_failures<R>(&self, f: impl FnOnce(&[CapturedFailure]) -> R) -> R {
        f(std::slice::from_ref(self))
    }
}

impl Report for [CapturedFailure] {
    fn with_failures<R>(&self, f: impl FnOnce(&[CapturedFailure]) -> R) -> R {
        f(self)
    }
}

impl Report for Vec<CapturedFailure> {
    fn with_failures<R>(&self, f: impl FnOnce(&[CapturedFailure]) -> R) -> R {
        f(self)
    }
}

impl Report for FailureAggregator {
    fn with_failures<R>(&self, f: impl FnOnce(&[CapturedFailure]) -> R) -> R {
        f(&self.snapshot())
    }
}

impl Report for RetryExhausted {
    fn with_failures<R>(&self, f: impl FnOnce(&[CapturedFailure]) -> R) -> R {
        f(self.failures())
    }
}
