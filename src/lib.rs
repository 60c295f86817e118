//! Sentence-by-sentence English study with narrated word highlighting.
//!
//! Articles are split into sentences, read aloud one sentence at a time, and
//! the word currently being spoken is highlighted. The playback layer works
//! against pluggable speech engines; when an engine gives no word-boundary
//! signal of its own, an estimated timeline keeps the highlight moving.

pub mod article;
pub mod config;
pub mod playback;
pub mod projector;
pub mod segmenter;
pub mod session;
pub mod sheets;
pub mod store;
pub mod timing;
