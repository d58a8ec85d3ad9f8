// Integration tests for the SRT converter: format detection, exact block
// output, and error reporting.

use anyhow::Result;
use podshrink::{convert_to_srt, ConvertError, TranscriptFormat};
use std::fs;

#[test]
fn test_time_range_input_exact_output() {
    let text = "00:00:00 - 00:00:05\nWelcome to the show\n\
                00:00:05 - 00:00:12\nToday we talk about subtitles";

    let srt = convert_to_srt(text).unwrap();

    assert_eq!(
        srt,
        "1\n\
         00:00:00,000 --> 00:00:05,000\n\
         Welcome to the show\n\
         \n\
         2\n\
         00:00:05,000 --> 00:00:09,000\n\
         Today we talk about subtitles\n"
    );
}

#[test]
fn test_last_block_gets_fixed_duration() {
    let text = "0:00 first line here\n0:10 second line here\n2:00 closing words";
    let srt = convert_to_srt(text).unwrap();

    // Last cue runs 4 seconds past its own start.
    assert!(srt.contains("00:02:00,000 --> 00:02:04,000"));
}

#[test]
fn test_empty_input_is_conversion_error() {
    match convert_to_srt("") {
        Err(ConvertError::EmptyInput) => {}
        other => panic!("expected EmptyInput, got {:?}", other),
    }
}

#[test]
fn test_detection_failure_is_reported_with_reason() {
    let err = convert_to_srt("no timestamps\nanywhere in\nthis text").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("could not detect"), "got: {}", message);
}

#[test]
fn test_speaker_format_prefixes_names() {
    let text = "00:00.00\nHost\nWelcome back to the podcast\n\
                00:04.50\nGuest\nThanks for having me\n\
                00:08.00\nHost\nLet's dive in";

    let srt = convert_to_srt(text).unwrap();

    assert!(srt.contains("Host: Welcome back to the podcast\n"));
    assert!(srt.contains("Guest: Thanks for having me\n"));
    assert!(srt.contains("00:00:04,500 --> 00:00:08,000"));
}

#[test]
fn test_detection_prefers_best_scoring_rule() {
    use podshrink::srt::detect_format;

    let range = "00:00:00 - 00:00:05\ntext\n00:00:05 - 00:00:10\ntext\n00:00:10 - 00:00:15\ntext";
    assert_eq!(detect_format(range).unwrap(), TranscriptFormat::TimeRange);

    let plain = "0:00 one\n0:10 two\n0:20 three";
    assert_eq!(
        detect_format(plain).unwrap(),
        TranscriptFormat::PlainTimestamp
    );
}

#[test]
fn test_converted_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let srt_path = dir.path().join("episode.srt");

    let text = "0:00 intro\n0:05 body\n0:10 outro";
    let srt = convert_to_srt(text)?;
    fs::write(&srt_path, &srt)?;

    let read_back = fs::read_to_string(&srt_path)?;
    assert_eq!(read_back, srt);
    assert!(read_back.starts_with("1\n00:00:00,000 --> 00:00:05,000\n"));

    Ok(())
}
