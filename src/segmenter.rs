//! Sentence segmentation for imported article text.
//!
//! Articles arrive as a single content string; study navigation, bookmarking
//! and narration all operate on 1-based sentence indices, so the split has to
//! be deterministic and stable across imports of the same text.

use crate::article::SentenceEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A maximal run of sentence-terminal punctuation closes one sentence, so
/// `"Wait... Really?"` splits once after the ellipsis, not three times.
static RE_TERMINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Split article content into indexed sentences.
///
/// Each terminal-punctuation run ends a sentence spanning from the previous
/// cut point through the run itself; the span is trimmed before it is kept.
/// Text after the last terminator becomes a final sentence if non-empty.
/// Indices start at 1 and only count emitted sentences, so they are always
/// contiguous.
pub fn segment(text: &str) -> Vec<SentenceEntry> {
    let mut sentences = Vec::new();
    let mut cut = 0usize;
    let mut index = 1usize;

    for m in RE_TERMINAL.find_iter(text) {
        let span = text[cut..m.end()].trim();
        if !span.is_empty() {
            sentences.push(SentenceEntry {
                index,
                text: span.to_string(),
            });
            index += 1;
        }
        cut = m.end();
    }

    let remainder = text[cut..].trim();
    if !remainder.is_empty() {
        sentences.push(SentenceEntry {
            index,
            text: remainder.to_string(),
        });
    }

    sentences
}

/// Prepare text for a synthesis request: NFC-normalize and collapse
/// whitespace runs so the provider sees clean single-spaced prose. Word
/// count is preserved, which keeps the estimated timeline aligned with the
/// audio the provider returns.
pub fn normalize_for_speech(text: &str) -> String {
    let composed: String = text.nfc().collect();
    RE_WHITESPACE
        .replace_all(composed.trim(), " ")
        .into_owned()
}
