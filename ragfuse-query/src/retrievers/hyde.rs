//! HyDE (Hypothetical Document Embeddings) retrieval.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use ragfuse_core::{
    Document, Result, RetrievalOptions,
    traits::{ChatModel, Embedder, Retriever, VectorStore},
};

use crate::hooks::Hooks;

/// Default prompt template. `{query}` is replaced by the user query.
pub const DEFAULT_HYDE_PROMPT: &str =
    "Write a detailed passage that would answer the question: {query}";

/// A retriever that searches with the embedding of a hypothetical answer.
///
/// The chat model writes a passage answering the query; that passage, not
/// the query, is embedded and used for vector search with `k = top_k`.
/// Vector store errors are returned without a stage tag.
#[derive(Debug, Clone)]
pub struct HydeRetriever {
    llm: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    prompt_template: String,
    hooks: Hooks,
}

impl HydeRetriever {
    /// Create a HyDE retriever with the default prompt.
    pub fn new(
        llm: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            llm,
            embedder,
            store,
            prompt_template: DEFAULT_HYDE_PROMPT.to_string(),
            hooks: Hooks::default(),
        }
    }

    /// Sets the prompt template. `{query}` marks where the query goes.
    #[must_use]
    pub fn with_prompt_template<S: Into<String>>(mut self, template: S) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Render the prompt for `query`.
    #[must_use]
    pub fn render_prompt(&self, query: &str) -> String {
        self.prompt_template.replace("{query}", query)
    }

    async fn search(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let passage = self
            .llm
            .complete(&self.render_prompt(query))
            .await
            .map_err(|e| e.in_stage("hyde generate"))?;
        debug!("Generated hypothetical document ({} chars)", passage.len());

        let embedding = self
            .embedder
            .embed(&passage)
            .await
            .map_err(|e| e.in_stage("hyde embed"))?;

        self.store
            .search(&embedding, options.top_k, &options.search_options())
            .await
    }
}

#[async_trait]
impl Retriever for HydeRetriever {
    #[instrument(skip(self, options), fields(retriever = "HydeRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.search(query, options).await;
        self.hooks.run_after(&result);

        if let Ok(docs) = &result {
            info!("HyDE retrieval completed: {} results", docs.len());
        }
        result
    }

    fn name(&self) -> &'static str {
        "HydeRetriever"
    }
}
