//! Keyword search, web search and reranking collaborators.

use async_trait::async_trait;

use crate::{Document, Result};

/// Sparse lexical search (BM25 or similar).
#[async_trait]
pub trait Bm25Searcher: Send + Sync + std::fmt::Debug {
    /// Return up to `k` documents ranked by keyword relevance.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

/// External web search used as a corrective fallback.
#[async_trait]
pub trait WebSearcher: Send + Sync + std::fmt::Debug {
    /// Return up to `k` documents from the web.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

/// Secondary relevance scoring pass, e.g. a cross-encoder.
#[async_trait]
pub trait Reranker: Send + Sync + std::fmt::Debug {
    /// Reorder (and rescore) `documents` for `query`.
    async fn rerank(&self, query: &str, documents: Vec<Document>) -> Result<Vec<Document>>;

    /// Get a human-readable name for this reranker.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
