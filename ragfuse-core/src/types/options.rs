//! Per-call retrieval options and vector search options.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of documents a retrieval call returns.
pub const DEFAULT_TOP_K: usize = 10;

/// Per-call retrieval parameters.
///
/// Built fresh for each call and never mutated by retrievers. Retrievers
/// that delegate pass the same options to their inner retrievers.
///
/// # Examples
///
/// ```rust
/// use ragfuse_core::types::RetrievalOptions;
///
/// let options = RetrievalOptions::new()
///     .with_top_k(5)
///     .with_threshold(0.7)
///     .with_filter("category", "tech");
///
/// assert_eq!(options.top_k, 5);
/// assert_eq!(options.limit(), Some(5));
/// assert!(options.search_options().threshold.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalOptions {
    /// Maximum number of documents to return. `0` means no limit.
    pub top_k: usize,

    /// Minimum score. `0.0` means unset.
    pub threshold: f64,

    /// Exact-match metadata filter, passed opaquely to vector search.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: 0.0,
            metadata: HashMap::new(),
        }
    }
}

impl RetrievalOptions {
    /// Create options with defaults (`top_k = 10`, no threshold, no filter).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of results.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the minimum score.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace the metadata filter.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single metadata filter entry.
    #[must_use]
    pub fn with_filter<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The result limit, or `None` when unlimited.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        (self.top_k > 0).then_some(self.top_k)
    }

    /// Vector search options derived from the threshold and metadata filter.
    ///
    /// A threshold of `0.0` means unset. Negative thresholds are forwarded
    /// since cosine and graded scores live in `[-1, 1]`.
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        let mut search = SearchOptions::default();
        if self.threshold != 0.0 && self.threshold.is_finite() {
            search.threshold = Some(self.threshold);
        }
        if !self.metadata.is_empty() {
            search.filter.clone_from(&self.metadata);
        }
        search
    }
}

/// Options passed to [`VectorStore::search`](crate::traits::VectorStore::search).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchOptions {
    /// Minimum similarity score, if any.
    pub threshold: Option<f64>,

    /// Metadata equality filter.
    pub filter: HashMap<String, serde_json::Value>,
}

impl SearchOptions {
    /// True when neither a threshold nor a filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threshold.is_none() && self.filter.is_empty()
    }
}
