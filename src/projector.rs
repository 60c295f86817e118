//! Maps boundary events onto rendered word tokens.
//!
//! The UI renders the display text as whitespace-delimited tokens and
//! highlights exactly one of them at a time. Boundary events carry character
//! offsets into the display text; `WordMap` resolves an offset to the token
//! whose range contains it. Ordering is the tracker's responsibility — no
//! reordering happens here.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Precomputed token start offsets for one display text.
#[derive(Debug, Clone)]
pub struct WordMap {
    text_len: usize,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
struct Token {
    start: usize,
    text: String,
}

impl WordMap {
    pub fn new(text: &str) -> Self {
        let tokens = RE_TOKEN
            .find_iter(text)
            .map(|m| Token {
                start: m.start(),
                text: m.as_str().to_string(),
            })
            .collect();
        WordMap {
            text_len: text.len(),
            tokens,
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|t| t.text.as_str())
    }

    /// Resolve a character offset to the index of the token whose range
    /// contains it. Each token's range runs from its own start to the next
    /// token's start (the last token extends to the end of the text).
    pub fn word_index_for(&self, char_index: usize) -> Option<usize> {
        if char_index >= self.text_len {
            return None;
        }
        for (i, token) in self.tokens.iter().enumerate() {
            let end = self
                .tokens
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(self.text_len);
            if char_index >= token.start && char_index < end {
                return Some(i);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_token_starts() {
        let map = WordMap::new("one two three");
        assert_eq!(map.word_index_for(0), Some(0));
        assert_eq!(map.word_index_for(4), Some(1));
        assert_eq!(map.word_index_for(8), Some(2));
    }

    #[test]
    fn offsets_inside_a_word_resolve_to_that_word() {
        let map = WordMap::new("one two three");
        assert_eq!(map.word_index_for(5), Some(1));
        // Trailing whitespace belongs to the preceding token's range.
        assert_eq!(map.word_index_for(3), Some(0));
    }

    #[test]
    fn last_token_range_extends_to_text_end() {
        let map = WordMap::new("one two three");
        assert_eq!(map.word_index_for(12), Some(2));
        assert_eq!(map.word_index_for(13), None);
        assert_eq!(map.word_index_for(100), None);
    }

    #[test]
    fn leading_whitespace_precedes_every_token() {
        let map = WordMap::new("  hi there");
        assert_eq!(map.token_count(), 2);
        assert_eq!(map.word_index_for(0), None);
        assert_eq!(map.word_index_for(2), Some(0));
        assert_eq!(map.token(1), Some("there"));
    }

    #[test]
    fn empty_text_maps_nothing() {
        let map = WordMap::new("");
        assert_eq!(map.token_count(), 0);
        assert_eq!(map.word_index_for(0), None);
    }
}
