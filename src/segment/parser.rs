use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::TranscriptSegment;

/// A line opens a new segment when it starts with a timestamp token:
/// "MM:SS", "H:MM:SS", optionally with fractional seconds ("1:23.45").
static SEGMENT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2}(?::\d{2})?(?:\.\d{1,2})?)\s*(.*)$").unwrap()
});

/// Split raw transcript text into ordered timestamped segments.
///
/// Lines matching the timestamp pattern open a new segment; other non-empty
/// lines are space-joined onto the open segment. Text appearing before the
/// first timestamp is collected under an implicit "00:00" segment. Blank
/// lines are skipped. A timestamp line with no following content produces
/// no segment, and accumulated text is never dropped.
///
/// A transcript with no timestamp-like lines (and no text at all) yields an
/// empty vec; reporting that to the user is the caller's decision.
pub fn parse_segments(text: &str) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();

    // The open segment, if any: (timestamp, accumulated text)
    let mut open: Option<(String, String)> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = SEGMENT_START.captures(line) {
            let timestamp = caps[1].to_string();
            let remainder = caps[2].trim().to_string();

            // Close the open segment, but only if it accumulated any text.
            if let Some((ts, body)) = open.take() {
                if !body.is_empty() {
                    segments.push(TranscriptSegment::new(ts, body));
                }
            }

            open = Some((timestamp, remainder));
        } else {
            match open.as_mut() {
                Some((_, body)) => {
                    if !body.is_empty() {
                        body.push(' ');
                    }
                    body.push_str(line);
                }
                None => {
                    // Transcript starts mid-sentence with no leading
                    // timestamp; anchor it at zero.
                    open = Some(("00:00".to_string(), line.to_string()));
                }
            }
        }
    }

    if let Some((ts, body)) = open.take() {
        if !body.is_empty() {
            segments.push(TranscriptSegment::new(ts, body));
        }
    }

    debug!("Parsed {} transcript segments", segments.len());

    segments
}
