//! Append-only, ordered collection of captured failures.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::failure::CapturedFailure;

/// Ordered, append-only collection of [`CapturedFailure`]s.
///
/// Insertion order is the contract: entries appear in the order attempts
/// completed. Entries are never deduplicated or removed.
///
/// Appends go through an internal mutex, so one aggregator may be shared
/// (by reference or behind an `Arc`) across concurrent retry calls. Each
/// append is atomic; entries from interleaved calls land in real-time
/// completion order.
///
/// # Examples
///
/// ```rust
/// use retrace_core::{CapturedFailure, FailureAggregator};
///
/// let aggregator = FailureAggregator::new();
/// aggregator.append(CapturedFailure::new("A", "first", ""));
/// aggregator.append(CapturedFailure::new("B", "second", ""));
/// aggregator.append(CapturedFailure::new("A", "third", ""));
///
/// assert_eq!(aggregator.len(), 3);
/// assert!(aggregator.contains_kind("B"));
/// assert_eq!(aggregator.filter_by_kind("A").len(), 2);
/// assert_eq!(aggregator.flatten_messages(), "first\nsecond\nthird");
/// ```
#[derive(Debug, Default)]
pub struct FailureAggregator {
    entries: Mutex<Vec<CapturedFailure>>,
}

impl FailureAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    // The vector is only ever pushed to, so a guard recovered from a
    // poisoned lock still holds a consistent prefix of entries.
    fn lock(&self) -> MutexGuard<'_, Vec<CapturedFailure>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a failure to the end of the collection.
    pub fn append(&self, failure: CapturedFailure) {
        self.lock().push(failure);
    }

    /// Add several failures, in iteration order, under a single lock.
    pub fn extend<I>(&self, failures: I)
    where
        I: IntoIterator<Item = CapturedFailure>,
    {
        self.lock().extend(failures);
    }

    /// All entries whose kind equals `kind`, in original order.
    pub fn filter_by_kind(&self, kind: &str) -> Vec<CapturedFailure> {
        self.lock()
            .iter()
            .filter(|failure| failure.kind() == kind)
            .cloned()
            .collect()
    }

    /// Whether any entry has the given kind.
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.lock().iter().any(|failure| failure.kind() == kind)
    }

    /// All messages joined by `\n`, in insertion order.
    pub fn flatten_messages(&self) -> String {
        self.lock()
            .iter()
            .map(CapturedFailure::message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of entries per distinct kind.
    pub fn count_by_kind(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for failure in self.lock().iter() {
            *counts.entry(failure.kind().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no failure has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current entries, in order.
    ///
    /// Rendering works from snapshots so it never holds the lock while
    /// formatting and never consumes the aggregator.
    pub fn snapshot(&self) -> Vec<CapturedFailure> {
        self.lock().clone()
    }
}

impl From<Vec<CapturedFailure>> for FailureAggregator {
    fn from(entries: Vec<CapturedFailure>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl FromIterator<CapturedFailure> for FailureAggregator {
    fn from_iter<I: IntoIterator<Item = CapturedFailure>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
