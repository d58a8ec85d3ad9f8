use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::ConvertError;

/// How many leading non-empty lines are sampled for detection.
pub const DETECTION_SAMPLE_LINES: usize = 50;

/// Transcript shapes the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TranscriptFormat {
    /// A bare "MM:SS.ss" timestamp on its own line, then a speaker-name
    /// line, then dialog lines (common Mac transcription-app export)
    TimestampSpeakerDialog,

    /// "HH:MM:SS - HH:MM:SS" time-range line followed by text
    TimeRange,

    /// "MM:SS text" / "H:MM:SS text" timestamp-prefixed lines (the shape
    /// the shrinker's own renderer emits)
    PlainTimestamp,
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranscriptFormat::TimestampSpeakerDialog => "timestamp/speaker/dialog",
            TranscriptFormat::TimeRange => "time-range",
            TranscriptFormat::PlainTimestamp => "plain-timestamp",
        };
        write!(f, "{}", name)
    }
}

/// One detection rule: a line pattern and the minimum number of sampled
/// lines that must match before the rule may win.
struct FormatRule {
    format: TranscriptFormat,
    pattern: &'static LazyLock<Regex>,
    min_matches: usize,
}

static BARE_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(?::\d{2})?\.\d{1,2}$").unwrap());

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}:\d{2}\s*-\s*\d{1,2}:\d{2}:\d{2}\b").unwrap()
});

static TIMESTAMP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(?::\d{2})?(?:\.\d{1,2})?\s+\S").unwrap());

/// Ordered rule table. On a match-count tie, the earlier rule wins; the
/// more specific shapes come first. Range lines are sparser than dialog
/// lines, so that rule's floor is lower.
static RULES: &[FormatRule] = &[
    FormatRule {
        format: TranscriptFormat::TimestampSpeakerDialog,
        pattern: &BARE_TIMESTAMP,
        min_matches: 3,
    },
    FormatRule {
        format: TranscriptFormat::TimeRange,
        pattern: &TIME_RANGE,
        min_matches: 2,
    },
    FormatRule {
        format: TranscriptFormat::PlainTimestamp,
        pattern: &TIMESTAMP_PREFIX,
        min_matches: 3,
    },
];

/// Detect the transcript's format by scoring each rule against the first
/// `DETECTION_SAMPLE_LINES` non-empty lines. The rule with the most
/// matching lines wins, provided it clears its own minimum.
pub fn detect_format(text: &str) -> Result<TranscriptFormat, ConvertError> {
    let sample: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(DETECTION_SAMPLE_LINES)
        .collect();

    let mut best: Option<(TranscriptFormat, usize)> = None;

    for rule in RULES {
        let matches = sample.iter().filter(|l| rule.pattern.is_match(l)).count();
        debug!("Format rule {} matched {} lines", rule.format, matches);

        if matches >= rule.min_matches {
            match best {
                Some((_, best_count)) if matches <= best_count => {}
                _ => best = Some((rule.format, matches)),
            }
        }
    }

    match best {
        Some((format, count)) => {
            debug!("Detected {} format ({} matching lines)", format, count);
            Ok(format)
        }
        None => Err(ConvertError::UnknownFormat {
            sampled: sample.len(),
        }),
    }
}
