//! Timestamp parsing and formatting
//!
//! Transcript timestamps arrive as loosely formatted strings ("1:30",
//! "01:02:03.5", sometimes just "45"). Parsing is lenient: a component that
//! fails to parse contributes zero rather than failing the whole value.

/// Parse a transcript timestamp into total seconds.
///
/// Accepts `"SS"`, `"MM:SS"`, `"MM:SS.ss"`, `"HH:MM:SS"` and
/// `"HH:MM:SS.ss"`. Unparsable components count as 0, so fully malformed
/// input yields 0.0 instead of an error.
pub fn parse_timestamp_seconds(text: &str) -> f64 {
    let parts: Vec<&str> = text.trim().split(':').collect();

    let component = |s: &str| s.trim().parse::<f64>().unwrap_or(0.0);

    match parts.len() {
        1 => component(parts[0]),
        2 => component(parts[0]) * 60.0 + component(parts[1]),
        3 => component(parts[0]) * 3600.0 + component(parts[1]) * 60.0 + component(parts[2]),
        _ => 0.0,
    }
}

/// Format seconds into the canonical transcript form: `"MM:SS"` under an
/// hour, `"H:MM:SS"` at or above it. Fractional seconds are rounded.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format seconds as an SRT timecode: `HH:MM:SS,mmm` with a comma decimal
/// separator, all fields zero-padded.
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}
