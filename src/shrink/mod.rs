//! Transcript shrinking
//!
//! This module provides the reduction pipeline that condenses a long
//! transcript into a handful of refined segments:
//! - `ShrinkConfig` tuning knobs with validated defaults
//! - The `Summarizer` capability seam (the model call lives behind it)
//! - `ShrinkDriver`, which walks windows sequentially, reports progress,
//!   honors cancellation, and merges near-duplicate summaries
//! - A deterministic extractive baseline summarizer for offline use

mod driver;
mod extractive;

pub use driver::ShrinkDriver;
pub use extractive::ExtractiveSummarizer;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::window::TranscriptWindow;

/// Tuning knobs for a shrink run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkConfig {
    /// Serialized-character budget per window
    pub max_window_chars: usize,

    /// Fraction (0.0–1.0) of a window's budget carried into the next
    /// window as context overlap
    pub overlap_percentage: f64,

    /// Desired approximate output size. Advisory: surfaced to the
    /// summarizer's own budgeting, never enforced by truncation.
    pub target_segment_count: usize,

    /// Merge candidates closer together than this many seconds
    pub min_seconds_between_segments: f64,

    /// Word-overlap coefficient (0.0–1.0) at or above which two adjacent
    /// summaries are treated as duplicates
    pub similarity_threshold: f64,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            max_window_chars: 4000,
            overlap_percentage: 0.15,
            target_segment_count: 20,
            min_seconds_between_segments: 30.0,
            similarity_threshold: 0.8,
        }
    }
}

impl ShrinkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_window_chars == 0 {
            bail!("max_window_chars must be positive");
        }
        if !(0.0..=1.0).contains(&self.overlap_percentage) {
            bail!(
                "overlap_percentage must be within 0.0-1.0, got {}",
                self.overlap_percentage
            );
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            bail!(
                "similarity_threshold must be within 0.0-1.0, got {}",
                self.similarity_threshold
            );
        }
        if self.min_seconds_between_segments < 0.0 {
            bail!("min_seconds_between_segments must not be negative");
        }
        Ok(())
    }
}

/// A condensed segment spanning one or more original segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedSegment {
    /// Opaque unique id
    pub id: Uuid,

    /// Start of the covered span, canonical timestamp form
    pub start_timestamp: String,

    /// End of the covered span, canonical timestamp form
    pub end_timestamp: String,

    /// Condensed text
    pub summary: String,

    /// Positions in the original segment sequence this summary covers
    pub original_segment_indices: Vec<usize>,
}

impl RefinedSegment {
    pub fn new(
        start_timestamp: impl Into<String>,
        end_timestamp: impl Into<String>,
        summary: impl Into<String>,
        original_segment_indices: Vec<usize>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_timestamp: start_timestamp.into(),
            end_timestamp: end_timestamp.into(),
            summary: summary.into(),
            original_segment_indices,
        }
    }
}

/// Summarization capability consumed by the driver.
///
/// The per-window call is the pipeline's single suspension and failure
/// point; latency, timeouts, and availability are the implementation's
/// concern, not the driver's.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense one window into refined segments. `target_count` is the
    /// advisory number of segments wanted from this window; implementations
    /// may exceed or undershoot it.
    async fn summarize(
        &self,
        window: &TranscriptWindow,
        target_count: usize,
    ) -> Result<Vec<RefinedSegment>>;

    /// Capability name for logging
    fn name(&self) -> &str;
}

/// Progress event emitted after every completed window.
#[derive(Debug, Clone, Serialize)]
pub struct ShrinkProgress {
    pub windows_completed: usize,
    pub windows_total: usize,
    /// Fraction complete, 0.0–1.0
    pub fraction: f64,
    /// Human-readable status line for the UI/log
    pub status: String,
}

/// Why a run stopped before processing every window.
#[derive(Debug, thiserror::Error)]
pub enum ShrinkHalt {
    #[error("summarization failed on window {window} of {total}: {message}")]
    SummarizeFailed {
        /// 1-based index of the failing window
        window: usize,
        total: usize,
        message: String,
    },

    #[error("cancelled after {completed} of {total} windows")]
    Cancelled { completed: usize, total: usize },
}

/// Result of a shrink run. Refined segments produced before a halt are
/// always retained; a halted run still exposes everything that succeeded.
#[derive(Debug)]
pub struct ShrinkOutcome {
    /// Merged refined segments from all completed windows
    pub refined: Vec<RefinedSegment>,

    pub windows_completed: usize,
    pub windows_total: usize,

    /// Present when the run stopped early
    pub halt: Option<ShrinkHalt>,
}

impl ShrinkOutcome {
    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

/// Render refined segments back to timestamp-prefixed plain text, one
/// `"MM:SS summary"` line per segment. The output is itself a valid
/// plain-timestamp transcript, so it can be fed straight to the SRT
/// converter.
pub fn render_transcript(refined: &[RefinedSegment]) -> String {
    let mut out = String::new();
    for segment in refined {
        out.push_str(&segment.start_timestamp);
        out.push(' ');
        out.push_str(&segment.summary);
        out.push('\n');
    }
    out
}
