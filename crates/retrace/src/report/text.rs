//! Plain-text log blocks.
//!
//! Every block is stamped with the time it was rendered, not the time the
//! failure was captured.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use retrace_core::CapturedFailure;

/// Line that closes every log block.
pub const DELIMITER: &str =
    "----------------------------------------------------------------------------";

/// Format used for the `Timestamp:` line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render failures as log blocks stamped with the current local time.
pub fn to_log_text(failures: &[CapturedFailure]) -> String {
    to_log_text_at(failures, Local::now())
}

/// Render failures as log blocks stamped with `rendered_at`.
///
/// Each block is:
///
/// ```text
/// Timestamp: <rendered_at>
/// Exception: <kind>
/// Message: <message>
/// StackTrace: <trace>
///
/// ----------------------------------------------------------------------------
///
/// ```
///
/// Empty input renders as an empty string.
pub fn to_log_text_at(failures: &[CapturedFailure], rendered_at: DateTime<Local>) -> String {
    let stamp = rendered_at.format(TIMESTAMP_FORMAT).to_string();
    let mut text = String::new();
    for failure in failures {
        let _ = writeln!(text, "Timestamp: {stamp}");
        let _ = writeln!(text, "Exception: {}", failure.kind());
        let _ = writeln!(text, "Message: {}", failure.message());
        let _ = writeln!(text, "StackTrace: {}", failure.trace());
        close_block(&mut text);
    }
    text
}

/// Render a free-form log entry block stamped with `rendered_at`.
pub fn entry_block_at(entry: &str, rendered_at: DateTime<Local>) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Timestamp: {}", rendered_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(text, "Entry: {entry}");
    close_block(&mut text);
    text
}

fn close_block(text: &mut String) {
    text.push('\n');
    text.push_str(DELIMITER);
    text.push('\n');
    text.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_block_layout() {
        let failure = CapturedFailure::new("app::Timeout", "took too long", "at fetch");
        let text = to_log_text_at(&[failure], fixed_time());

        let expected = format!(
            "Timestamp: 2024-03-09 14:05:07\n\
             Exception: app::Timeout\n\
             Message: took too long\n\
             StackTrace: at fetch\n\
             \n\
             {DELIMITER}\n\
             \n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_blocks_follow_input_order() {
        let failures = vec![
            CapturedFailure::new("A", "first", ""),
            CapturedFailure::new("B", "second", ""),
        ];
        let text = to_log_text_at(&failures, fixed_time());

        assert_eq!(text.matches(DELIMITER).count(), 2);
        assert!(text.find("Message: first").unwrap() < text.find("Message: second").unwrap());
    }

    #[test]
    fn test_uses_render_time_not_capture_time() {
        let captured = Local
            .with_ymd_and_hms(1999, 12, 31, 23, 59, 59)
            .unwrap()
            .with_timezone(&chrono::Utc);
        let failure = CapturedFailure::at("K", "m", "", captured);

        let text = to_log_text_at(&[failure], fixed_time());
        assert!(text.starts_with("Timestamp: 2024-03-09 14:05:07\n"));
        assert!(!text.contains("1999"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_log_text_at(&[], fixed_time()), "");
    }

    #[test]
    fn test_entry_block() {
        let text = entry_block_at("nightly sync finished", fixed_time());

        assert!(text.starts_with("Timestamp: 2024-03-09 14:05:07\nEntry: nightly sync finished\n\n"));
        assert!(text.ends_with(&format!("{DELIMITER}\n\n")));
    }

    proptest::proptest! {
        #[test]
        fn test_one_block_per_failure(messages in proptest::collection::vec("[a-z ]{0,20}", 0..8)) {
            let failures: Vec<_> = messages
                .iter()
                .map(|m| CapturedFailure::new("K", m.clone(), ""))
                .collect();
            let text = to_log_text_at(&failures, fixed_time());

            proptest::prop_assert_eq!(text.matches(DELIMITER).count(), failures.len());
            proptest::prop_assert_eq!(text.matches("Timestamp: ").count(), failures.len());
        }
    }
}
