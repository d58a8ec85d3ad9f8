pub mod config;
pub mod segment;
pub mod shrink;
pub mod srt;
pub mod text;
pub mod timecode;
pub mod window;

pub use config::Config;
pub use segment::{parse_segments, TranscriptSegment};
pub use shrink::{
    render_transcript, ExtractiveSummarizer, RefinedSegment, ShrinkConfig, ShrinkDriver,
    ShrinkHalt, ShrinkOutcome, ShrinkProgress, Summarizer,
};
pub use srt::{convert_to_srt, ConvertError, SubtitleCue, TranscriptFormat};
pub use text::{word_overlap_similarity, TextCleaner, WhitespaceCleaner};
pub use window::{TranscriptWindow, WindowBuilder, WindowMode};
