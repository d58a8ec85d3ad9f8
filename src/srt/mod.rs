//! Subtitle (SRT) conversion
//!
//! This module turns raw transcript text into strict SRT output:
//! - Format detection against an ordered table of known transcript shapes
//! - Cue extraction per detected format
//! - End-time computation (next cue's start, fixed tail duration for the
//!   last cue)
//! - Bit-exact SRT emission, loadable by standard consumers

mod convert;
mod detect;

pub use convert::{convert_to_srt, extract_cues};
pub use detect::{detect_format, TranscriptFormat};

use serde::Serialize;

use crate::timecode::format_srt_time;

/// Duration assigned to the final cue, which has no successor to borrow a
/// start time from.
pub const LAST_CUE_SECONDS: f64 = 4.0;

/// Conversion failure surfaced to the user. Never a panic.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("transcript is empty")]
    EmptyInput,

    #[error("could not detect a known transcript format in the first {sampled} lines")]
    UnknownFormat { sampled: usize },

    #[error("detected {format} format but found no usable cues")]
    NoCues { format: TranscriptFormat },
}

/// One subtitle cue extracted from the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleCue {
    /// Start time in seconds
    pub start_seconds: f64,

    /// Speaker name, for formats that carry one
    pub speaker: Option<String>,

    /// Dialog text
    pub text: String,
}

/// Emit cues as SRT: 1-based block numbers, comma-decimal timecodes, a
/// blank line between blocks, speaker name prefixed when present.
///
/// End times are computed, not carried: each cue ends where the next begins;
/// the last cue runs `LAST_CUE_SECONDS` past its own start.
pub fn emit_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();

    for (i, cue) in cues.iter().enumerate() {
        let end_seconds = match cues.get(i + 1) {
            Some(next) => next.start_seconds,
            None => cue.start_seconds + LAST_CUE_SECONDS,
        };

        if i > 0 {
            out.push('\n');
        }

        out.push_str(&format!(
            "{}\n{} --> {}\n",
            i + 1,
            format_srt_time(cue.start_seconds),
            format_srt_time(end_seconds)
        ));

        match &cue.speaker {
            Some(speaker) => out.push_str(&format!("{}: {}\n", speaker, cue.text)),
            None => {
                out.push_str(&cue.text);
                out.push('\n');
            }
        }
    }

    out
}
