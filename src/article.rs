//! Data model for imported study material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sentence of an article. Indices are 1-based and contiguous within the
/// owning article; entries are never mutated after segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceEntry {
    pub index: usize,
    pub text: String,
}

/// An importable unit of study text with its derived sentences.
///
/// `last_accessed` is bumped every time a study session opens the article;
/// the store lists articles most recently accessed first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub topic: Option<String>,
    pub title: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub length_label: Option<String>,
    pub content: String,
    pub sentences: Vec<SentenceEntry>,
    #[serde(default)]
    pub sheet_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl Article {
    /// Build an article from raw text, segmenting the content immediately.
    pub fn from_text(id: impl Into<String>, title: impl Into<String>, content: String) -> Self {
        let now = Utc::now();
        let sentences = crate::segmenter::segment(&content);
        Article {
            id: id.into(),
            number: None,
            topic: None,
            title: title.into(),
            difficulty: None,
            length_label: None,
            content,
            sentences,
            sheet_name: None,
            created_at: now,
            last_accessed: now,
        }
    }
}

/// A sentence bookmarked for later review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSentence {
    pub id: String,
    pub article_id: String,
    pub article_title: String,
    pub sentence_index: usize,
    pub text: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedSentence {
    /// Saved sentences are keyed by article and sentence index, so saving the
    /// same sentence twice overwrites rather than duplicates.
    pub fn id_for(article_id: &str, sentence_index: usize) -> String {
        format!("{article_id}-{sentence_index}")
    }
}
