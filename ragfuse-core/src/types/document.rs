//! Document type returned by every retriever.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A retrieved document.
///
/// Documents are value-like: stages copy them rather than share them, and
/// fusion, reranking and relevance grading overwrite [`Document::score`].
/// Scores from different producers (similarity, RRF, LLM relevance in -1..1)
/// are not comparable without normalization.
///
/// # Examples
///
/// ```rust
/// use ragfuse_core::types::Document;
///
/// let doc = Document::new("doc-1", "Rust is a systems programming language.")
///     .with_score(0.87)
///     .with_metadata("source", "rust-book");
///
/// assert_eq!(doc.id, "doc-1");
/// assert_eq!(doc.score, 0.87);
/// assert_eq!(doc.metadata["source"], "rust-book");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier. May be empty, and is not guaranteed unique across
    /// sources until deduplicated.
    pub id: String,

    /// Textual content.
    pub content: String,

    /// Relevance score assigned by the most recent producer.
    #[serde(default)]
    pub score: f64,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document with the given identifier and content.
    pub fn new<I, C>(id: I, content: C) -> Self
    where
        I: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            content: content.into(),
            score: 0.0,
            metadata: HashMap::new(),
        }
    }

    /// Set the score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get a metadata value by key.
    pub fn get_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }
}
