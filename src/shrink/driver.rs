use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{RefinedSegment, ShrinkConfig, ShrinkHalt, ShrinkOutcome, ShrinkProgress, Summarizer};
use crate::segment::TranscriptSegment;
use crate::text::word_overlap_similarity;
use crate::timecode::parse_timestamp_seconds;
use crate::window::{WindowBuilder, WindowMode};

/// Drives the shrink pipeline: windows the transcript, summarizes each
/// window strictly in order, and merges near-duplicate adjacent summaries.
///
/// A driver owns no shared state across runs; concurrent runs over the same
/// transcript are not supported and must be serialized by the caller.
pub struct ShrinkDriver {
    config: ShrinkConfig,

    /// Injected summarization capability
    summarizer: Arc<dyn Summarizer>,

    /// Cooperative cancellation flag, checked between windows
    cancelled: Arc<AtomicBool>,
}

impl ShrinkDriver {
    pub fn new(config: ShrinkConfig, summarizer: Arc<dyn Summarizer>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            summarizer,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle the caller can use to request cancellation from another task.
    /// The request takes effect at the next window boundary; completed
    /// windows are kept.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run the full pipeline over parsed segments.
    ///
    /// Windows are processed sequentially so progress is monotonic. After
    /// each window a `ShrinkProgress` event is sent on `progress` (if
    /// provided). On summarizer failure or cancellation the run halts,
    /// keeps every refined segment produced so far, and records the reason
    /// in the outcome. This method itself never fails.
    pub async fn run(
        &self,
        segments: &[TranscriptSegment],
        progress: Option<mpsc::UnboundedSender<ShrinkProgress>>,
    ) -> ShrinkOutcome {
        self.cancelled.store(false, Ordering::SeqCst);

        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: self.config.max_window_chars,
            },
            self.config.overlap_percentage,
        );
        let windows = builder.build(segments);
        let total = windows.len();

        info!(
            "Shrink run: {} segments, {} windows, summarizer '{}'",
            segments.len(),
            total,
            self.summarizer.name()
        );

        let mut refined: Vec<RefinedSegment> = Vec::new();
        let mut completed = 0usize;
        let mut halt = None;

        for (i, window) in windows.iter().enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                warn!("Shrink cancelled after {} of {} windows", completed, total);
                halt = Some(ShrinkHalt::Cancelled { completed, total });
                break;
            }

            match self
                .summarizer
                .summarize(window, self.window_target(total))
                .await
            {
                Ok(mut batch) => {
                    refined.append(&mut batch);
                    completed += 1;

                    let event = ShrinkProgress {
                        windows_completed: completed,
                        windows_total: total,
                        fraction: completed as f64 / total as f64,
                        status: format!(
                            "Summarized window {}/{} ({} refined segments so far)",
                            completed,
                            total,
                            refined.len()
                        ),
                    };
                    info!("{}", event.status);
                    if let Some(tx) = &progress {
                        // Receiver may have gone away; progress is
                        // observational only.
                        let _ = tx.send(event);
                    }
                }
                Err(e) => {
                    let window_number = i + 1;
                    warn!(
                        "Summarization failed on window {}/{}: {:#}",
                        window_number, total, e
                    );
                    halt = Some(ShrinkHalt::SummarizeFailed {
                        window: window_number,
                        total,
                        message: format!("{:#}", e),
                    });
                    break;
                }
            }
        }

        let merged = self.merge_adjacent(refined);

        info!(
            "Shrink run finished: {}/{} windows, {} refined segments",
            completed,
            total,
            merged.len()
        );

        ShrinkOutcome {
            refined: merged,
            windows_completed: completed,
            windows_total: total,
            halt,
        }
    }

    /// Per-window advisory target: the overall target split evenly across
    /// windows, at least one.
    fn window_target(&self, windows_total: usize) -> usize {
        if windows_total == 0 {
            return self.config.target_segment_count.max(1);
        }
        (self.config.target_segment_count / windows_total).max(1)
    }

    /// Collapse adjacent refined segments that say the same thing at nearly
    /// the same time.
    ///
    /// Two neighbors merge when their summaries' word-overlap similarity
    /// reaches the threshold AND their start timestamps are closer than
    /// `min_seconds_between_segments`. The merged segment keeps the earlier
    /// start, the later end, and the longer summary text (the earlier one
    /// on a length tie); covered indices are unioned.
    fn merge_adjacent(&self, refined: Vec<RefinedSegment>) -> Vec<RefinedSegment> {
        let mut merged: Vec<RefinedSegment> = Vec::new();

        for segment in refined {
            let collapse = match merged.last() {
                Some(prev) => {
                    let similarity = word_overlap_similarity(&prev.summary, &segment.summary);
                    let gap = (parse_timestamp_seconds(&segment.start_timestamp)
                        - parse_timestamp_seconds(&prev.start_timestamp))
                    .abs();

                    similarity >= self.config.similarity_threshold
                        && gap < self.config.min_seconds_between_segments
                }
                None => false,
            };

            if collapse {
                let prev = merged.last_mut().unwrap();
                Self::collapse_into(prev, segment);
            } else {
                merged.push(segment);
            }
        }

        merged
    }

    fn collapse_into(prev: &mut RefinedSegment, next: RefinedSegment) {
        // Later end wins, by parsed time.
        if parse_timestamp_seconds(&next.end_timestamp)
            > parse_timestamp_seconds(&prev.end_timestamp)
        {
            prev.end_timestamp = next.end_timestamp;
        }

        // Longer summary survives; ties keep the earlier text.
        if next.summary.len() > prev.summary.len() {
            prev.summary = next.summary;
        }

        prev.original_segment_indices
            .extend(next.original_segment_indices);
        prev.original_segment_indices.sort_unstable();
        prev.original_segment_indices.dedup();
    }
}
