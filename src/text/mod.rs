//! Text utilities
//!
//! Word-overlap similarity used by the shrink merge pass, and the cleaning
//! pre-pass seam that strips non-transcript noise before parsing.

use std::collections::HashSet;

/// Lexical similarity between two strings as a word-overlap coefficient.
///
/// Both inputs are lowercased and split on whitespace into unique-token
/// sets; the score is `|intersection| / min(|a|, |b|)`, in [0, 1]. Returns
/// 0.0 when either input has no tokens.
pub fn word_overlap_similarity(a: &str, b: &str) -> f64 {
    let tokens = |s: &str| -> HashSet<String> {
        s.to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect()
    };

    let set_a = tokens(a);
    let set_b = tokens(b);

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / set_a.len().min(set_b.len()) as f64
}

/// Cleaning pre-pass applied to raw transcript text before parsing.
///
/// Implementations must be idempotent and side-effect-free; the parser
/// assumes cleaning a cleaned transcript is a no-op.
pub trait TextCleaner: Send + Sync {
    fn clean(&self, raw: &str) -> String;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Default cleaner: strips a leading BOM, trims trailing whitespace per
/// line, and collapses runs of blank lines down to one.
pub struct WhitespaceCleaner;

impl TextCleaner for WhitespaceCleaner {
    fn clean(&self, raw: &str) -> String {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut out = String::with_capacity(raw.len());
        let mut previous_blank = false;

        for line in raw.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                if !previous_blank && !out.is_empty() {
                    out.push('\n');
                }
                previous_blank = true;
            } else {
                out.push_str(line);
                out.push('\n');
                previous_blank = false;
            }
        }

        out
    }

    fn name(&self) -> &str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(word_overlap_similarity("hello world", "hello world"), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(word_overlap_similarity("a b", "c d"), 0.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = "the quick brown fox";
        let b = "the slow brown dog";
        assert_eq!(
            word_overlap_similarity(a, b),
            word_overlap_similarity(b, a)
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(word_overlap_similarity("Hello World", "hello world"), 1.0);
    }

    #[test]
    fn test_subset_uses_smaller_set() {
        // All of "hello world" appears in the longer string, so the overlap
        // coefficient is 1.0 even though the longer string adds tokens.
        assert_eq!(
            word_overlap_similarity("hello world", "hello world again today"),
            1.0
        );
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(word_overlap_similarity("", "hello"), 0.0);
        assert_eq!(word_overlap_similarity("hello", "   "), 0.0);
        assert_eq!(word_overlap_similarity("", ""), 0.0);
    }

    #[test]
    fn test_whitespace_cleaner_idempotent() {
        let cleaner = WhitespaceCleaner;
        let raw = "\u{feff}line one   \n\n\n\nline two\t\n";
        let once = cleaner.clean(raw);
        let twice = cleaner.clean(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "line one\n\nline two\n");
    }
}
