//! Dense plus sparse retrieval fused with RRF.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use ragfuse_core::{
    Document, Result, RetrievalOptions,
    traits::{Bm25Searcher, Embedder, Retriever, VectorStore},
};

use crate::fusion::{DEFAULT_RRF_K, FusionStrategy, RrfStrategy, truncate_top_k};
use crate::hooks::Hooks;

/// Minimum number of candidates fetched from each leg.
pub const MIN_CANDIDATES: usize = 20;

/// A retriever combining vector similarity search with BM25 keyword search.
///
/// Each leg over-fetches `max(top_k * 2, 20)` candidates before the two
/// lists are fused with Reciprocal Rank Fusion. Metadata filters and the
/// score threshold only apply to the vector leg.
#[derive(Debug, Clone)]
pub struct HybridRetriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    bm25: Arc<dyn Bm25Searcher>,
    rrf: RrfStrategy,
    hooks: Hooks,
}

impl HybridRetriever {
    /// Create a hybrid retriever with `k = 60`.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        bm25: Arc<dyn Bm25Searcher>,
    ) -> Self {
        Self {
            store,
            embedder,
            bm25,
            rrf: RrfStrategy::new(DEFAULT_RRF_K),
            hooks: Hooks::default(),
        }
    }

    /// Set the RRF smoothing constant. `k <= 0` selects the default.
    #[must_use]
    pub fn with_rrf_k(mut self, k: i64) -> Self {
        self.rrf = RrfStrategy::new(k);
        self
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The effective RRF smoothing constant.
    #[must_use]
    pub fn rrf_k(&self) -> i64 {
        self.rrf.k()
    }

    /// Number of candidates each leg fetches for a given `top_k`.
    #[must_use]
    pub fn candidate_count(top_k: usize) -> usize {
        top_k.saturating_mul(2).max(MIN_CANDIDATES)
    }

    async fn hybrid_search(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let fetch_k = Self::candidate_count(options.top_k);

        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| e.in_stage("hybrid embed"))?;

        let vector_results = self
            .store
            .search(&embedding, fetch_k, &options.search_options())
            .await
            .map_err(|e| e.in_stage("hybrid vector search"))?;

        let bm25_results = self
            .bm25
            .search(query, fetch_k)
            .await
            .map_err(|e| e.in_stage("hybrid bm25 search"))?;

        debug!(
            "Fusing {} vector and {} keyword candidates",
            vector_results.len(),
            bm25_results.len()
        );

        let mut fused = self
            .rrf
            .fuse(vec![vector_results, bm25_results])
            .await
            .map_err(|e| e.in_stage("hybrid fuse"))?;
        truncate_top_k(&mut fused, options.top_k);
        Ok(fused)
    }
}

#[async_trait]
impl Retriever for HybridRetriever {
    #[instrument(skip(self, options), fields(retriever = "HybridRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.hybrid_search(query, options).await;
        self.hooks.run_after(&result);

        if let Ok(docs) = &result {
            info!("Hybrid retrieval completed: {} results", docs.len());
        }
        result
    }

    fn name(&self) -> &'static str {
        "HybridRetriever"
    }
}
