//! Playback duration estimation and per-word timeline construction.
//!
//! When the speech engine gives us no authoritative word-boundary signal the
//! tracker falls back to a schedule computed here. The estimate blends a
//! word-count basis with a character-count basis so texts with unusually long
//! or short words do not skew too far in either direction, then allots each
//! word a share of the total proportional to its length.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Spoken duration allotted per word at rate 1.0.
pub const DEFAULT_BASE_WORD_MS: u64 = 400;

/// Typical English word length, used to convert the per-word baseline into a
/// per-character one for the blended estimate.
const AVG_WORD_CHARS: f64 = 5.0;

/// Guard against division blow-up at near-zero rates.
const MIN_RATE: f32 = 0.05;

/// One entry of the estimated schedule. `char_offset` is the byte offset of
/// the word in the text the timeline was built from; spans are half-open
/// `[start, end)` and tile the full duration with no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTiming {
    pub word: String,
    pub char_offset: usize,
    pub start: Duration,
    pub end: Duration,
}

/// Estimate how long `text` takes to speak at `rate`, using the default
/// per-word baseline.
pub fn estimate_duration(text: &str, rate: f32) -> Duration {
    estimate_duration_with_base(text, rate, DEFAULT_BASE_WORD_MS)
}

pub fn estimate_duration_with_base(text: &str, rate: f32, base_word_ms: u64) -> Duration {
    let letters: usize = RE_WORD
        .find_iter(text)
        .map(|m| m.as_str().chars().count())
        .sum();
    let words = RE_WORD.find_iter(text).count();
    Duration::from_secs_f64(blended_total_ms(words, letters, rate, base_word_ms) / 1000.0)
}

/// Build the fallback word schedule for `text` spoken at `rate`.
///
/// Entries are strictly increasing in both start time and character offset,
/// each word's share is proportional to its length relative to the text's
/// average word length, and the spans cover `[0, total)` exactly.
pub fn word_timeline(text: &str, rate: f32) -> Vec<WordTiming> {
    word_timeline_with_base(text, rate, DEFAULT_BASE_WORD_MS)
}

pub fn word_timeline_with_base(text: &str, rate: f32, base_word_ms: u64) -> Vec<WordTiming> {
    let words: Vec<(usize, &str)> = RE_WORD
        .find_iter(text)
        .map(|m| (m.start(), m.as_str()))
        .collect();
    if words.is_empty() {
        return Vec::new();
    }

    let letters: usize = words.iter().map(|(_, w)| w.chars().count()).sum();
    let total_ms = blended_total_ms(words.len(), letters, rate, base_word_ms);

    let mut timeline = Vec::with_capacity(words.len());
    let mut cursor_ms = 0.0f64;
    for (offset, word) in words {
        let share = total_ms * word.chars().count() as f64 / letters as f64;
        let end_ms = cursor_ms + share;
        timeline.push(WordTiming {
            word: word.to_string(),
            char_offset: offset,
            start: Duration::from_secs_f64(cursor_ms / 1000.0),
            end: Duration::from_secs_f64(end_ms / 1000.0),
        });
        cursor_ms = end_ms;
    }
    timeline
}

fn blended_total_ms(words: usize, letters: usize, rate: f32, base_word_ms: u64) -> f64 {
    if words == 0 {
        return 0.0;
    }
    let word_basis = words as f64 * base_word_ms as f64;
    let char_basis = letters as f64 * (base_word_ms as f64 / AVG_WORD_CHARS);
    let blended = (word_basis + char_basis) / 2.0;
    blended / f64::from(rate.max(MIN_RATE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_word_oracle_at_unit_rate() {
        // 4 words at 400ms = 1600ms; 15 letters at 80ms = 1200ms; blended 1400ms.
        let d = estimate_duration("one two three four", 1.0);
        assert_eq!(d.as_millis(), 1400);
    }

    #[test]
    fn duration_decreases_as_rate_increases() {
        let text = "the quick brown fox jumps over the lazy dog";
        let slow = estimate_duration(text, 0.8);
        let normal = estimate_duration(text, 1.0);
        let fast = estimate_duration(text, 2.0);
        assert!(slow > normal);
        assert!(normal > fast);
    }

    #[test]
    fn near_zero_rate_does_not_blow_up() {
        let d = estimate_duration("a few words here", 0.0);
        assert!(d < Duration::from_secs(3600));
    }

    #[test]
    fn empty_text_has_zero_duration_and_empty_timeline() {
        assert_eq!(estimate_duration("", 1.0), Duration::ZERO);
        assert!(word_timeline("  \n ", 1.0).is_empty());
    }

    #[test]
    fn timeline_tiles_the_estimate_without_gaps() {
        let text = "one two three four";
        let timeline = word_timeline(text, 1.0);
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline[0].start, Duration::ZERO);
        for pair in timeline.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].char_offset < pair[1].char_offset);
            assert!(pair[0].start < pair[1].start);
        }
        let total = timeline.last().unwrap().end;
        let estimate = estimate_duration(text, 1.0);
        assert!(total.abs_diff(estimate) < Duration::from_micros(10));
    }

    #[test]
    fn longer_words_get_proportionally_more_time() {
        let timeline = word_timeline("a extraordinarily b", 1.0);
        let short = timeline[0].end - timeline[0].start;
        let long = timeline[1].end - timeline[1].start;
        assert!(long > short * 10);
    }

    #[test]
    fn offsets_point_at_the_source_words() {
        let text = "alpha  beta\ngamma";
        let timeline = word_timeline(text, 1.0);
        for entry in &timeline {
            assert_eq!(
                &text[entry.char_offset..entry.char_offset + entry.word.len()],
                entry.word
            );
        }
    }
}
