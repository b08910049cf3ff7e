//! JSON failure reports.

use retrace_core::CapturedFailure;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Wire form of one failure in a JSON report.
///
/// Field order is fixed (`message`, `trace`, `kind`) so reports are
/// byte-stable across calls. The capture timestamp is not part of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Failure message.
    pub message: String,
    /// Call-stack or cause-chain text.
    pub trace: String,
    /// Fully-qualified failure type name.
    pub kind: String,
}

impl From<&CapturedFailure> for FailureRecord {
    fn from(failure: &CapturedFailure) -> Self {
        Self {
            message: failure.message().to_string(),
            trace: failure.trace().to_string(),
            kind: failure.kind().to_string(),
        }
    }
}

/// Render failures as a pretty-printed JSON array, one object per failure.
///
/// Empty input renders as `[]`.
pub fn to_json(failures: &[CapturedFailure]) -> Result<String> {
    let records: Vec<FailureRecord> = failures.iter().map(FailureRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parse a report produced by [`to_json`].
pub fn from_json(json: &str) -> Result<Vec<FailureRecord>> {
    Ok(serde_json::from_str(json)?)
}
