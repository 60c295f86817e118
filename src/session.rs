//! Sentence-by-sentence study session over one article.
//!
//! The session tracks a 1-based cursor into the article's sentences and
//! decides what text is on display: either the current sentence alone, or a
//! cumulative window of sentences ending at the cursor.

use chrono::Utc;
use tracing::debug;

use crate::article::{Article, SavedSentence, SentenceEntry};

/// How many sentences the cumulative display reaches back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Full,
    Sentences(usize),
}

pub struct LearningSession {
    article: Article,
    /// 1-based; clamped to `1..=sentence_count()` whenever it moves.
    current_index: usize,
    cumulative: bool,
    window: Window,
}

impl LearningSession {
    pub fn new(article: Article, cumulative: bool, window: Window) -> Self {
        LearningSession {
            article,
            current_index: 1,
            cumulative,
            window,
        }
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn sentence_count(&self) -> usize {
        self.article.sentences.len()
    }

    pub fn is_cumulative(&self) -> bool {
        self.cumulative
    }

    pub fn set_cumulative(&mut self, cumulative: bool) {
        self.cumulative = cumulative;
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn set_window(&mut self, window: Window) {
        self.window = window;
    }

    pub fn current_sentence(&self) -> Option<&SentenceEntry> {
        self.article.sentences.get(self.current_index.wrapping_sub(1))
    }

    /// The text currently on display. In cumulative mode this is the window
    /// of sentences ending at the cursor, joined with single spaces; in
    /// single mode it is just the current sentence.
    pub fn display_text(&self) -> String {
        if !self.cumulative || self.sentence_count() == 0 {
            return self
                .current_sentence()
                .map(|s| s.text.clone())
                .unwrap_or_default();
        }
        let first = match self.window {
            Window::Full => 1,
            Window::Sentences(n) => self.current_index.saturating_sub(n.saturating_sub(1)).max(1),
        };
        self.article.sentences[first - 1..self.current_index]
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Move to the next sentence. Returns false at the end of the article.
    pub fn next(&mut self) -> bool {
        if self.current_index < self.sentence_count() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous sentence. Returns false at the first sentence.
    pub fn prev(&mut self) -> bool {
        if self.current_index > 1 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn set_index(&mut self, index: usize) {
        self.current_index = index.clamp(1, self.sentence_count().max(1));
    }

    /// Jump straight to a sentence for focused review. Jumping always drops
    /// out of cumulative mode so the target sentence stands alone.
    pub fn jump_to(&mut self, index: usize) {
        self.set_index(index);
        if self.cumulative {
            debug!(index, "leaving cumulative mode for sentence jump");
            self.cumulative = false;
        }
    }

    /// `(current, total)` for progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index, self.sentence_count())
    }

    /// Bookmark the current sentence. Only meaningful in single-sentence
    /// mode, where exactly one sentence is on display.
    pub fn saved_sentence(&self) -> Option<SavedSentence> {
        if self.cumulative {
            return None;
        }
        let sentence = self.current_sentence()?;
        Some(SavedSentence {
            id: SavedSentence::id_for(&self.article.id, sentence.index),
            article_id: self.article.id.clone(),
            article_title: self.article.title.clone(),
            sentence_index: sentence.index,
            text: sentence.text.clone(),
            saved_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article::from_text(
            "a-1",
            "Sample",
            "First one. Second one. Third one. Fourth one.".to_string(),
        )
    }

    #[test]
    fn single_mode_shows_the_current_sentence() {
        let mut session = LearningSession::new(article(), false, Window::Full);
        assert_eq!(session.display_text(), "First one.");
        assert!(session.next());
        assert_eq!(session.display_text(), "Second one.");
    }

    #[test]
    fn cumulative_full_window_joins_from_the_start() {
        let mut session = LearningSession::new(article(), true, Window::Full);
        session.set_index(3);
        assert_eq!(session.display_text(), "First one. Second one. Third one.");
    }

    #[test]
    fn cumulative_fixed_window_reaches_back_n_sentences() {
        let mut session = LearningSession::new(article(), true, Window::Sentences(2));
        session.set_index(4);
        assert_eq!(session.display_text(), "Third one. Fourth one.");
        // A window larger than the history just shows everything so far.
        session.set_index(1);
        assert_eq!(session.display_text(), "First one.");
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = LearningSession::new(article(), false, Window::Full);
        assert!(!session.prev());
        assert_eq!(session.current_index(), 1);
        session.set_index(99);
        assert_eq!(session.current_index(), 4);
        assert!(!session.next());
        assert_eq!(session.progress(), (4, 4));
    }

    #[test]
    fn jump_leaves_cumulative_mode() {
        let mut session = LearningSession::new(article(), true, Window::Full);
        session.jump_to(3);
        assert!(!session.is_cumulative());
        assert_eq!(session.display_text(), "Third one.");
    }

    #[test]
    fn saving_only_works_in_single_mode() {
        let mut session = LearningSession::new(article(), true, Window::Full);
        assert!(session.saved_sentence().is_none());
        session.set_cumulative(false);
        session.set_index(2);
        let saved = session.saved_sentence().unwrap();
        assert_eq!(saved.id, "a-1-2");
        assert_eq!(saved.text, "Second one.");
        assert_eq!(saved.article_title, "Sample");
    }

    #[test]
    fn empty_article_displays_nothing() {
        let session = LearningSession::new(
            Article::from_text("a-2", "Empty", "   ".to_string()),
            false,
            Window::Full,
        );
        assert_eq!(session.display_text(), "");
        assert!(session.current_sentence().is_none());
    }
}
