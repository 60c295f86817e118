//! Persistence for articles and saved sentences.
//!
//! `FileStore` keeps one JSON file per record under the configured data
//! directory, using a hash of the record id as the filename to avoid
//! filesystem issues. `MemoryStore` backs tests and throwaway sessions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::article::{Article, SavedSentence};

const ARTICLES_DIR: &str = "articles";
const SENTENCES_DIR: &str = "sentences";

pub trait ArticleStore {
    fn put_article(&self, article: &Article) -> Result<()>;
    fn get_article(&self, id: &str) -> Result<Option<Article>>;
    fn delete_article(&self, id: &str) -> Result<()>;
    /// All articles, most recently accessed first.
    fn list_articles(&self) -> Result<Vec<Article>>;
    /// Bump `last_accessed` to now.
    fn touch_article(&self, id: &str) -> Result<()>;
    fn clear_articles(&self) -> Result<()>;

    fn put_sentence(&self, sentence: &SavedSentence) -> Result<()>;
    fn delete_sentence(&self, id: &str) -> Result<()>;
    /// All saved sentences, most recently saved first.
    fn list_sentences(&self) -> Result<Vec<SavedSentence>>;
    fn is_sentence_saved(&self, article_id: &str, sentence_index: usize) -> Result<bool>;
}

fn hashed_name(id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    format!("{:x}.json", hasher.finalize())
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(ARTICLES_DIR)).context("creating article store dir")?;
        fs::create_dir_all(root.join(SENTENCES_DIR)).context("creating sentence store dir")?;
        Ok(FileStore { root })
    }

    fn article_path(&self, id: &str) -> PathBuf {
        self.root.join(ARTICLES_DIR).join(hashed_name(id))
    }

    fn sentence_path(&self, id: &str) -> PathBuf {
        self.root.join(SENTENCES_DIR).join(hashed_name(id))
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value).context("serializing record")?;
        fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Read every record in a directory, skipping files that fail to parse so
    /// one corrupt record does not take the whole store down.
    fn read_all<T: serde::de::DeserializeOwned>(&self, dir: &str) -> Result<Vec<T>> {
        let dir = self.root.join(dir);
        let mut records = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let data = match fs::read_to_string(&path) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable record skipped");
                    continue;
                }
            };
            match serde_json::from_str(&data) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "corrupt record skipped"),
            }
        }
        Ok(records)
    }
}

impl ArticleStore for FileStore {
    fn put_article(&self, article: &Article) -> Result<()> {
        Self::write_json(&self.article_path(&article.id), article)
    }

    fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let path = self.article_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(serde_json::from_str(&data).context("parsing article")?))
    }

    fn delete_article(&self, id: &str) -> Result<()> {
        let path = self.article_path(id);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("deleting {}", path.display()))?;
        }
        Ok(())
    }

    fn list_articles(&self) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self.read_all(ARTICLES_DIR)?;
        articles.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        Ok(articles)
    }

    fn touch_article(&self, id: &str) -> Result<()> {
        if let Some(mut article) = self.get_article(id)? {
            article.last_accessed = Utc::now();
            self.put_article(&article)?;
        }
        Ok(())
    }

    fn clear_articles(&self) -> Result<()> {
        let dir = self.root.join(ARTICLES_DIR);
        fs::remove_dir_all(&dir).with_context(|| format!("clearing {}", dir.display()))?;
        fs::create_dir_all(&dir).context("recreating article store dir")?;
        Ok(())
    }

    fn put_sentence(&self, sentence: &SavedSentence) -> Result<()> {
        Self::write_json(&self.sentence_path(&sentence.id), sentence)
    }

    fn delete_sentence(&self, id: &str) -> Result<()> {
        let path = self.sentence_path(id);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("deleting {}", path.display()))?;
        }
        Ok(())
    }

    fn list_sentences(&self) -> Result<Vec<SavedSentence>> {
        let mut sentences: Vec<SavedSentence> = self.read_all(SENTENCES_DIR)?;
        sentences.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(sentences)
    }

    fn is_sentence_saved(&self, article_id: &str, sentence_index: usize) -> Result<bool> {
        Ok(self
            .sentence_path(&SavedSentence::id_for(article_id, sentence_index))
            .exists())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    articles: Mutex<HashMap<String, Article>>,
    sentences: Mutex<HashMap<String, SavedSentence>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArticleStore for MemoryStore {
    fn put_article(&self, article: &Article) -> Result<()> {
        self.articles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(article.id.clone(), article.clone());
        Ok(())
    }

    fn get_article(&self, id: &str) -> Result<Option<Article>> {
        Ok(self
            .articles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned())
    }

    fn delete_article(&self, id: &str) -> Result<()> {
        self.articles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        Ok(())
    }

    fn list_articles(&self) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self
            .articles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        Ok(articles)
    }

    fn touch_article(&self, id: &str) -> Result<()> {
        if let Some(article) = self
            .articles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(id)
        {
            article.last_accessed = Utc::now();
        }
        Ok(())
    }

    fn clear_articles(&self) -> Result<()> {
        self.articles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        Ok(())
    }

    fn put_sentence(&self, sentence: &SavedSentence) -> Result<()> {
        self.sentences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(sentence.id.clone(), sentence.clone());
        Ok(())
    }

    fn delete_sentence(&self, id: &str) -> Result<()> {
        self.sentences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        Ok(())
    }

    fn list_sentences(&self) -> Result<Vec<SavedSentence>> {
        let mut sentences: Vec<SavedSentence> = self
            .sentences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        sentences.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(sentences)
    }

    fn is_sentence_saved(&self, article_id: &str, sentence_index: usize) -> Result<bool> {
        Ok(self
            .sentences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&SavedSentence::id_for(article_id, sentence_index)))
    }
}
