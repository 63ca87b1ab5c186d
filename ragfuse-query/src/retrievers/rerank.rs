//! Rerank an inner retriever's results.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use ragfuse_core::{
    Document, Result, RetrievalOptions,
    traits::{Reranker, Retriever},
};

use crate::fusion::truncate_top_k;
use crate::hooks::Hooks;

/// A retriever that passes another retriever's results through a [`Reranker`].
///
/// The reranker is called once with the whole result set, then the
/// `on_rerank` hook fires and the list is cut to `top_n`. Empty results
/// skip the reranker.
#[derive(Debug, Clone)]
pub struct RerankRetriever {
    retriever: Arc<dyn Retriever>,
    reranker: Arc<dyn Reranker>,
    top_n: usize,
    hooks: Hooks,
}

impl RerankRetriever {
    /// Create a rerank retriever that keeps every reranked document.
    pub fn new(retriever: Arc<dyn Retriever>, reranker: Arc<dyn Reranker>) -> Self {
        Self {
            retriever,
            reranker,
            top_n: 0,
            hooks: Hooks::default(),
        }
    }

    /// Keep at most `top_n` documents after reranking. `0` keeps all.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    async fn rerank(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let docs = self.retriever.retrieve(query, options).await?;
        if docs.is_empty() {
            return Ok(docs);
        }

        debug!("Reranking {} documents with {}", docs.len(), self.reranker.name());
        let mut reranked = self
            .reranker
            .rerank(query, docs.clone())
            .await
            .map_err(|e| e.in_stage("retriever: rerank"))?;

        self.hooks.run_on_rerank(query, &docs, &reranked);
        truncate_top_k(&mut reranked, self.top_n);
        Ok(reranked)
    }
}

#[async_trait]
impl Retriever for RerankRetriever {
    #[instrument(skip(self, options), fields(retriever = "RerankRetriever"))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.rerank(query, options).await;
        self.hooks.run_after(&result);
        result
    }

    fn name(&self) -> &'static str {
        "RerankRetriever"
    }
}
