use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use super::{detect_format, emit_srt, ConvertError, SubtitleCue, TranscriptFormat};
use crate::segment::parse_segments;
use crate::timecode::parse_timestamp_seconds;

static BARE_TIMESTAMP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(?::\d{2})?\.\d{1,2}$").unwrap());

static RANGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2}:\d{2})\s*-\s*\d{1,2}:\d{2}:\d{2}\b").unwrap()
});

/// Convert raw transcript text to SRT.
///
/// Detects the input shape, extracts cues, and emits numbered blocks.
/// Empty input and unrecognizable input are typed errors for the caller to
/// surface; this function does not panic on malformed text.
pub fn convert_to_srt(raw: &str) -> Result<String, ConvertError> {
    if raw.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let format = detect_format(raw)?;
    let cues = extract_cues(raw, format);

    if cues.is_empty() {
        return Err(ConvertError::NoCues { format });
    }

    info!("Converted {} cues from {} input", cues.len(), format);

    Ok(emit_srt(&cues))
}

/// Split the full input into ordered cues using the detected format.
pub fn extract_cues(raw: &str, format: TranscriptFormat) -> Vec<SubtitleCue> {
    match format {
        TranscriptFormat::PlainTimestamp => extract_plain(raw),
        TranscriptFormat::TimeRange => extract_time_range(raw),
        TranscriptFormat::TimestampSpeakerDialog => extract_speaker_dialog(raw),
    }
}

/// Plain timestamp-prefixed lines reuse the segment parser; a cue is a
/// segment without a speaker.
fn extract_plain(raw: &str) -> Vec<SubtitleCue> {
    parse_segments(raw)
        .into_iter()
        .map(|segment| SubtitleCue {
            start_seconds: segment.start_seconds(),
            speaker: None,
            text: segment.text,
        })
        .collect()
}

/// "HH:MM:SS - HH:MM:SS" header lines; the following lines up to the next
/// header are the cue text. The range's own end time is ignored: end times
/// are recomputed from the next cue's start at emission.
fn extract_time_range(raw: &str) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut open: Option<(f64, Vec<String>)> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = RANGE_LINE.captures(line) {
            if let Some((start, text_lines)) = open.take() {
                push_cue(&mut cues, start, None, text_lines);
            }
            open = Some((parse_timestamp_seconds(&caps[1]), Vec::new()));
        } else if let Some((_, text_lines)) = open.as_mut() {
            text_lines.push(line.to_string());
        }
    }

    if let Some((start, text_lines)) = open.take() {
        push_cue(&mut cues, start, None, text_lines);
    }

    cues
}

/// Bare "MM:SS.ss" timestamp line, then a speaker-name line, then dialog
/// lines until the next bare timestamp.
fn extract_speaker_dialog(raw: &str) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut open: Option<(f64, Option<String>, Vec<String>)> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if BARE_TIMESTAMP_LINE.is_match(line) {
            if let Some((start, speaker, text_lines)) = open.take() {
                push_cue(&mut cues, start, speaker, text_lines);
            }
            open = Some((parse_timestamp_seconds(line), None, Vec::new()));
        } else if let Some((_, speaker, text_lines)) = open.as_mut() {
            if speaker.is_none() && text_lines.is_empty() {
                *speaker = Some(line.to_string());
            } else {
                text_lines.push(line.to_string());
            }
        }
        // Lines before the first timestamp have no cue to belong to and
        // are dropped; this format always opens with a timestamp.
    }

    if let Some((start, speaker, text_lines)) = open.take() {
        push_cue(&mut cues, start, speaker, text_lines);
    }

    cues
}

fn push_cue(
    cues: &mut Vec<SubtitleCue>,
    start_seconds: f64,
    speaker: Option<String>,
    text_lines: Vec<String>,
) {
    let text = text_lines.join(" ");
    if text.is_empty() {
        return;
    }
    cues.push(SubtitleCue {
        start_seconds,
        speaker,
        text,
    });
}
