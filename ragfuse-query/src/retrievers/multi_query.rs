//! Query expansion: retrieve for several LLM-generated phrasings of a query.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use ragfuse_core::{
    Document, Result, RetrievalOptions,
    traits::{ChatModel, Retriever},
};

use crate::hooks::Hooks;

/// Default number of generated query variants.
pub const DEFAULT_NUM_QUERIES: usize = 3;

/// Upper bound on generated query variants.
pub const MAX_NUM_QUERIES: usize = 10;

/// A retriever that asks a chat model for alternative phrasings of the query
/// and merges the inner retriever's results for all of them.
///
/// The original query is always retrieved as well. Documents are merged in
/// query order and an ID that was already seen is dropped, so the first copy
/// wins. Any failure aborts the whole call.
#[derive(Debug, Clone)]
pub struct MultiQueryRetriever {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn ChatModel>,
    num_queries: usize,
    hooks: Hooks,
}

impl MultiQueryRetriever {
    /// Create a multi-query retriever generating three variants.
    pub fn new(retriever: Arc<dyn Retriever>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            llm,
            num_queries: DEFAULT_NUM_QUERIES,
            hooks: Hooks::default(),
        }
    }

    /// Set the number of variants, clamped to `1..=10`.
    #[must_use]
    pub fn with_num_queries(mut self, num_queries: usize) -> Self {
        self.num_queries = num_queries.clamp(1, MAX_NUM_QUERIES);
        self
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Number of variants requested from the model.
    #[must_use]
    pub fn num_queries(&self) -> usize {
        self.num_queries
    }

    fn build_prompt(&self, query: &str) -> String {
        format!(
            "You are an AI assistant. Generate {} different versions of the given \
             question to retrieve relevant documents from a vector database. \
             Provide the alternative questions one per line, without numbering.\n\n\
             Original question: {query}",
            self.num_queries
        )
    }

    /// Generate the query variants. The original query is not included.
    ///
    /// # Errors
    ///
    /// Returns the chat model's error tagged `multiquery generate`.
    pub async fn generate_queries(&self, query: &str) -> Result<Vec<String>> {
        let prompt = self.build_prompt(query);
        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| e.in_stage("multiquery generate"))?;

        let variants = parse_queries(&reply, self.num_queries);
        debug!("Generated {} query variants", variants.len());
        Ok(variants)
    }

    async fn retrieve_all(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let mut queries = self.generate_queries(query).await?;
        queries.push(query.to_string());

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for q in &queries {
            let docs = self
                .retriever
                .retrieve(q, options)
                .await
                .map_err(|e| e.in_stage(format!("multiquery retrieve {q:?}")))?;
            merged.extend(docs.into_iter().filter(|doc| seen.insert(doc.id.clone())));
        }

        info!(
            "Merged {} unique documents from {} queries",
            merged.len(),
            queries.len()
        );
        Ok(merged)
    }
}

/// Split model output into at most `limit` trimmed, non-empty lines.
fn parse_queries(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(String::from)
        .collect()
}

#[async_trait]
impl Retriever for MultiQueryRetriever {
    #[instrument(skip(self, options), fields(retriever = "MultiQueryRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.retrieve_all(query, options).await;
        self.hooks.run_after(&result);
        result
    }

    fn name(&self) -> &'static str {
        "MultiQueryRetriever"
    }
}
