//! Dense retrieval: embed the query and search a vector store.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use ragfuse_core::{
    Document, Result, RetrievalOptions,
    traits::{Embedder, Retriever, VectorStore},
};

use crate::hooks::Hooks;

/// A retriever that embeds the query and runs a similarity search.
///
/// Threshold and metadata filters from [`RetrievalOptions`] are forwarded to
/// the store as [`ragfuse_core::SearchOptions`]. Store errors are returned
/// as they are.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ragfuse_query::retrievers::VectorStoreRetriever;
/// use ragfuse_core::prelude::*;
///
/// # async fn example(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Result<()> {
/// let retriever = VectorStoreRetriever::new(store, embedder);
/// let docs = retriever
///     .retrieve("What is machine learning?", &RetrievalOptions::new().with_top_k(5))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VectorStoreRetriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    hooks: Hooks,
}

impl VectorStoreRetriever {
    /// Create a new vector store retriever.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            hooks: Hooks::default(),
        }
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    async fn search(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        debug!("Generating embedding for query");
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| e.in_stage("vector embed"))?;

        debug!("Performing vector search with top_k: {}", options.top_k);
        self.store
            .search(&embedding, options.top_k, &options.search_options())
            .await
    }
}

#[async_trait]
impl Retriever for VectorStoreRetriever {
    #[instrument(skip(self, options), fields(retriever = "VectorStoreRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.search(query, options).await;
        self.hooks.run_after(&result);

        if let Ok(docs) = &result {
            info!("Retrieved {} results", docs.len());
        }
        result
    }

    fn name(&self) -> &'static str {
        "VectorStoreRetriever"
    }
}
