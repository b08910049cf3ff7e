//! HTML failure reports, suitable as a notification body.

use std::fmt::Write as _;

use retrace_core::CapturedFailure;

/// Heading that opens every HTML report.
pub const HEADING: &str = "<h2>Exceptions:</h2>";

const TABLE_OPEN: &str = "<table style='border-collapse: collapse; width: 100%;'>";
const TABLE_CLOSE: &str = "</table>";

/// Render failures as a heading followed by one table.
///
/// Each failure becomes one row group: a `Type:` label and the kind, a
/// `Message:` label and the message, a `Stack Trace:` label and the trace in
/// a `<pre>` block, then an empty spacer row.
///
/// Values are inserted verbatim. Nothing is escaped.
pub fn to_html(failures: &[CapturedFailure]) -> String {
    let mut html = String::with_capacity(HEADING.len() + TABLE_OPEN.len() + 512 * failures.len());
    html.push_str(HEADING);
    html.push_str(TABLE_OPEN);

    for failure in failures {
        push_label(&mut html, "Type:");
        push_value(&mut html, failure.kind());
        push_label(&mut html, "Message:");
        push_value(&mut html, failure.message());
        push_label(&mut html, "Stack Trace:");
        let _ = write!(
            html,
            "<tr><td colspan='2'><div style='padding-left: 20px;'><pre>{}</pre></div></td></tr>",
            failure.trace()
        );
        html.push_str("<tr><td colspan='2' style='padding: 10px 0;'></td></tr>");
    }

    html.push_str(TABLE_CLOSE);
    html
}

fn push_label(html: &mut String, label: &str) {
    let _ = write!(html, "<tr><td colspan='2'><strong>{label}</strong></td></tr>");
}

fn push_value(html: &mut String, value: &str) {
    let _ = write!(
        html,
        "<tr><td colspan='2' style='padding-left: 20px;'>{value}</td></tr>"
    );
}
