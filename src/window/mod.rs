//! Transcript windowing
//!
//! Groups parsed segments into overlapping windows bounded by a size
//! budget. A window is the unit of work handed to the summarizer; the tail
//! of each window is carried into the head of the next so the summarizer
//! keeps conversational context across the boundary.

use serde::Serialize;
use tracing::debug;

use crate::segment::TranscriptSegment;

/// Structural bytes of a segment's JSON object form,
/// `{"timestamp":"…","text":"…"}`, excluding the two string payloads.
const SERIALIZED_OVERHEAD: usize = 26;

/// Approximate size of a segment if serialized into the structured form
/// sent to the summarizer. This is a stable byte-length formula, not a
/// token count for any particular model tokenizer.
pub fn serialized_segment_size(segment: &TranscriptSegment) -> usize {
    segment.timestamp.len() + segment.text.len() + SERIALIZED_OVERHEAD
}

/// How the builder decides a window is full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum WindowMode {
    /// Close once the serialized character count reaches the budget
    Characters { max_window_chars: usize },
    /// Close once the window holds this many segments
    SegmentCount { max_segments: usize },
}

/// A contiguous, possibly-overlapping run of segments.
///
/// Always non-empty. Transient: built per shrink run, consumed once by the
/// driver, never persisted.
#[derive(Debug, Clone)]
pub struct TranscriptWindow {
    /// Segments in source order; the leading ones may be overlap carried
    /// from the previous window (same segment identities).
    pub segments: Vec<TranscriptSegment>,

    /// Position of `segments[0]` in the original segment sequence. Windows
    /// are contiguous runs, so `first_index + i` locates `segments[i]`.
    pub first_index: usize,

    /// Sum of `serialized_segment_size` over `segments`
    pub serialized_chars: usize,
}

impl TranscriptWindow {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            first_index: 0,
            serialized_chars: 0,
        }
    }

    fn push(&mut self, segment: TranscriptSegment) {
        self.serialized_chars += serialized_segment_size(&segment);
        self.segments.push(segment);
    }

    fn push_front(&mut self, segment: TranscriptSegment) {
        self.serialized_chars += serialized_segment_size(&segment);
        self.segments.insert(0, segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Builds overlapping windows from an ordered segment sequence.
pub struct WindowBuilder {
    mode: WindowMode,
    /// Fraction (0.0–1.0) of a window's budget re-seeded into the next
    /// window as context overlap
    overlap_percentage: f64,
}

impl WindowBuilder {
    pub fn new(mode: WindowMode, overlap_percentage: f64) -> Self {
        Self {
            mode,
            overlap_percentage: overlap_percentage.clamp(0.0, 1.0),
        }
    }

    /// Group `segments` into ordered windows.
    ///
    /// Every window is non-empty and contiguous in source order. A segment
    /// larger than the whole budget still forms its own window; nothing is
    /// ever dropped. Each input segment is appended exactly once, so the
    /// builder cannot loop.
    pub fn build(&self, segments: &[TranscriptSegment]) -> Vec<TranscriptWindow> {
        let mut windows = Vec::new();
        let mut current = TranscriptWindow::new();
        // Count of segments in `current` that are fresh input rather than
        // overlap seeds; a trailing window of seeds alone is not emitted.
        let mut fresh = 0usize;

        for (position, segment) in segments.iter().enumerate() {
            if current.is_empty() {
                current.first_index = position;
            }
            current.push(segment.clone());
            fresh += 1;

            if self.is_full(&current) {
                let closed = std::mem::replace(&mut current, TranscriptWindow::new());
                current = self.seed_overlap(&closed);
                fresh = 0;
                windows.push(closed);
            }
        }

        if fresh > 0 {
            windows.push(current);
        }

        debug!(
            "Built {} windows from {} segments",
            windows.len(),
            segments.len()
        );

        windows
    }

    fn is_full(&self, window: &TranscriptWindow) -> bool {
        match self.mode {
            WindowMode::Characters { max_window_chars } => {
                window.serialized_chars >= max_window_chars
            }
            WindowMode::SegmentCount { max_segments } => window.len() >= max_segments.max(1),
        }
    }

    /// Seed the next window with the tail of a just-closed one, walking
    /// backward until the overlap budget is reached or the closed window is
    /// exhausted. The seeds keep their segment identities so the driver can
    /// recognize duplicated coverage.
    fn seed_overlap(&self, closed: &TranscriptWindow) -> TranscriptWindow {
        let mut next = TranscriptWindow::new();

        let budget = match self.mode {
            WindowMode::Characters { max_window_chars } => {
                (self.overlap_percentage * max_window_chars as f64) as usize
            }
            WindowMode::SegmentCount { max_segments } => {
                // Interpreted as a fraction of the segment budget; the
                // serialized size check below never trips in this mode.
                let count = (self.overlap_percentage * max_segments as f64).ceil() as usize;
                for segment in closed.segments.iter().rev().take(count) {
                    next.push_front(segment.clone());
                }
                next.first_index = closed.first_index + closed.len() - next.len();
                return next;
            }
        };

        if budget == 0 {
            return next;
        }

        for segment in closed.segments.iter().rev() {
            if next.serialized_chars >= budget {
                break;
            }
            next.push_front(segment.clone());
        }
        next.first_index = closed.first_index + closed.len() - next.len();

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::parse_segments;
    use uuid::Uuid;

    fn segments(n: usize) -> Vec<TranscriptSegment> {
        (0..n)
            .map(|i| TranscriptSegment::new(format!("{}:00", i), format!("segment number {}", i)))
            .collect()
    }

    fn flattened_ids(windows: &[TranscriptWindow]) -> Vec<Uuid> {
        let mut seen = Vec::new();
        for w in windows {
            for s in &w.segments {
                if !seen.contains(&s.id) {
                    seen.push(s.id);
                }
            }
        }
        seen
    }

    #[test]
    fn test_dedup_concat_reproduces_input_order() {
        let input = segments(20);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 200,
            },
            0.2,
        );
        let windows = builder.build(&input);

        assert!(windows.len() > 1);
        let ids = flattened_ids(&windows);
        let expected: Vec<Uuid> = input.iter().map(|s| s.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_all_windows_non_empty() {
        let input = segments(15);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 120,
            },
            0.3,
        );
        for window in builder.build(&input) {
            assert!(!window.is_empty());
        }
    }

    #[test]
    fn test_oversized_segment_forms_single_window() {
        let big = TranscriptSegment::new("0:00", "x".repeat(500));
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 100,
            },
            0.25,
        );
        let windows = builder.build(std::slice::from_ref(&big));

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].segments.len(), 1);
        assert_eq!(windows[0].segments[0].id, big.id);
    }

    #[test]
    fn test_overlap_shares_identities() {
        let input = segments(12);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 150,
            },
            0.4,
        );
        let windows = builder.build(&input);
        assert!(windows.len() >= 2);

        for pair in windows.windows(2) {
            let tail_ids: Vec<Uuid> = pair[0].segments.iter().map(|s| s.id).collect();
            let head = &pair[1].segments[0];
            assert!(
                tail_ids.contains(&head.id),
                "next window must open with a segment carried from the prior window"
            );
        }
    }

    #[test]
    fn test_zero_overlap() {
        let input = segments(10);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 100,
            },
            0.0,
        );
        let windows = builder.build(&input);

        let total: usize = windows.iter().map(|w| w.len()).sum();
        assert_eq!(total, input.len(), "no duplication when overlap is zero");
    }

    #[test]
    fn test_segment_count_mode() {
        let input = segments(10);
        let builder = WindowBuilder::new(WindowMode::SegmentCount { max_segments: 4 }, 0.25);
        let windows = builder.build(&input);

        assert!(windows.iter().all(|w| w.len() <= 5));
        let ids = flattened_ids(&windows);
        assert_eq!(ids.len(), input.len());
    }

    #[test]
    fn test_first_index_locates_segments_globally() {
        let input = segments(20);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 200,
            },
            0.2,
        );
        for window in builder.build(&input) {
            for (i, s) in window.segments.iter().enumerate() {
                assert_eq!(input[window.first_index + i].id, s.id);
            }
        }
    }

    #[test]
    fn test_empty_input_builds_no_windows() {
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 100,
            },
            0.2,
        );
        assert!(builder.build(&[]).is_empty());
    }

    #[test]
    fn test_serialized_size_matches_json_length() {
        let segment = TranscriptSegment::new("1:23", "hello there");
        let json = serde_json::json!({
            "timestamp": segment.timestamp,
            "text": segment.text,
        });
        assert_eq!(
            serialized_segment_size(&segment),
            serde_json::to_string(&json).unwrap().len()
        );
    }

    #[test]
    fn test_windows_are_contiguous_runs() {
        let text = "0:00 one\n0:10 two\n0:20 three\n0:30 four\n0:40 five\n0:50 six";
        let input = parse_segments(text);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: 80,
            },
            0.2,
        );
        let windows = builder.build(&input);

        let positions: std::collections::HashMap<Uuid, usize> = input
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();

        for window in &windows {
            let idx: Vec<usize> = window.segments.iter().map(|s| positions[&s.id]).collect();
            for pair in idx.windows(2) {
                assert_eq!(pair[1], pair[0] + 1, "window must be a contiguous run");
            }
        }
    }
}
