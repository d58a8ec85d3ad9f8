//! Transcript segments
//!
//! This module provides the `TranscriptSegment` unit produced by the parser:
//! - Line-oriented parsing of loosely timestamped transcript text
//! - Continuation-line coalescing into the preceding segment
//! - Graceful degradation on untimestamped input

mod parser;

pub use parser::parse_segments;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single timestamped unit of transcript text.
///
/// Immutable once created by the parser. Identity (and equality) is by id,
/// not content: the same `(timestamp, text)` pair parsed twice yields two
/// distinct segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Opaque unique id
    pub id: Uuid,

    /// Timestamp as it appeared in the source ("MM:SS" or "H:MM:SS" form)
    pub timestamp: String,

    /// Spoken content from this timestamp until the next detected timestamp
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }

    /// Start time in seconds, parsed leniently from the timestamp string.
    pub fn start_seconds(&self) -> f64 {
        crate::timecode::parse_timestamp_seconds(&self.timestamp)
    }
}

impl PartialEq for TranscriptSegment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TranscriptSegment {}
