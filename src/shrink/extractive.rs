use anyhow::{bail, Result};

use super::{RefinedSegment, Summarizer};
use crate::window::TranscriptWindow;

/// Cap on an extracted summary, so a rambling opening sentence does not
/// swallow the whole group.
const MAX_SUMMARY_CHARS: usize = 200;

/// Deterministic offline summarizer: lead-sentence extraction.
///
/// Splits a window into `target_count` contiguous groups of near-equal
/// size and keeps each group's opening sentence. No model call, identical
/// input always yields identical output; this is the CLI default and the
/// reference capability for pipeline tests. Callers wanting real
/// condensation plug their own `Summarizer` in.
pub struct ExtractiveSummarizer;

#[async_trait::async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(
        &self,
        window: &TranscriptWindow,
        target_count: usize,
    ) -> Result<Vec<RefinedSegment>> {
        if window.is_empty() {
            bail!("cannot summarize an empty window");
        }

        let groups = target_count.max(1).min(window.len());
        let per_group = window.len().div_ceil(groups);

        let mut refined = Vec::with_capacity(groups);

        for chunk_start in (0..window.len()).step_by(per_group) {
            let chunk_end = (chunk_start + per_group).min(window.len());
            let group = &window.segments[chunk_start..chunk_end];

            let joined = group
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            refined.push(RefinedSegment::new(
                group[0].timestamp.clone(),
                group[group.len() - 1].timestamp.clone(),
                lead_sentence(&joined),
                (window.first_index + chunk_start..window.first_index + chunk_end).collect(),
            ));
        }

        Ok(refined)
    }

    fn name(&self) -> &str {
        "extractive"
    }
}

/// First sentence of `text`, capped at `MAX_SUMMARY_CHARS` on a word
/// boundary.
fn lead_sentence(text: &str) -> String {
    let text = text.trim();

    let sentence = match text.find(['.', '!', '?']) {
        Some(end) => &text[..=end],
        None => text,
    };

    if sentence.len() <= MAX_SUMMARY_CHARS {
        return sentence.to_string();
    }

    let mut cut = MAX_SUMMARY_CHARS;
    while cut > 0 && !sentence.is_char_boundary(cut) {
        cut -= 1;
    }
    match sentence[..cut].rfind(' ') {
        Some(space) => sentence[..space].to_string(),
        None => sentence[..cut].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::parse_segments;
    use crate::window::{WindowBuilder, WindowMode};

    fn one_window(text: &str) -> TranscriptWindow {
        let segments = parse_segments(text);
        let builder = WindowBuilder::new(
            WindowMode::Characters {
                max_window_chars: usize::MAX,
            },
            0.0,
        );
        builder.build(&segments).remove(0)
    }

    #[tokio::test]
    async fn test_extractive_is_deterministic() {
        let text = "0:00 First topic opens. More detail here.\n\
                    0:30 Second topic follows. Even more words.\n\
                    1:00 Third topic closes. Final remarks.";
        let window = one_window(text);

        let a = ExtractiveSummarizer.summarize(&window, 2).await.unwrap();
        let b = ExtractiveSummarizer.summarize(&window, 2).await.unwrap();

        let strip = |v: &[RefinedSegment]| {
            v.iter()
                .map(|r| {
                    (
                        r.start_timestamp.clone(),
                        r.end_timestamp.clone(),
                        r.summary.clone(),
                        r.original_segment_indices.clone(),
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&a), strip(&b));
    }

    #[tokio::test]
    async fn test_extractive_takes_lead_sentences() {
        let text = "0:00 Opening line. Trailing chatter.\n0:30 Second segment here.";
        let window = one_window(text);

        let refined = ExtractiveSummarizer.summarize(&window, 2).await.unwrap();
        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].summary, "Opening line.");
        assert_eq!(refined[0].start_timestamp, "0:00");
        assert_eq!(refined[0].end_timestamp, "0:00");
        assert_eq!(refined[0].original_segment_indices, vec![0]);
        assert_eq!(refined[1].original_segment_indices, vec![1]);
    }

    #[tokio::test]
    async fn test_target_larger_than_window_is_clamped() {
        let window = one_window("0:00 only one segment here.");
        let refined = ExtractiveSummarizer.summarize(&window, 10).await.unwrap();
        assert_eq!(refined.len(), 1);
    }

    #[test]
    fn test_lead_sentence_cap() {
        let long = "word ".repeat(100);
        let lead = lead_sentence(&long);
        assert!(lead.len() <= MAX_SUMMARY_CHARS);
        assert!(!lead.ends_with(' '));
    }
}
