//! Route queries by complexity: skip retrieval, simple, or complex.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use ragfuse_core::{
    Document, Result, RetrievalOptions,
    traits::{ChatModel, Retriever},
};

use crate::hooks::Hooks;

/// How much retrieval a query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryComplexity {
    /// The model can answer without any documents.
    NoRetrieval,
    /// A single retrieval pass is enough.
    Simple,
    /// Multi-step or multi-source retrieval is needed.
    Complex,
}

impl QueryComplexity {
    /// The label the classifier is asked to answer with.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRetrieval => "no_retrieval",
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }

    /// Classify a model response.
    ///
    /// Matching is case-insensitive and by substring: `no_retrieval` wins over
    /// `complex`, and anything unrecognized is [`QueryComplexity::Simple`].
    ///
    /// ```rust
    /// use ragfuse_query::retrievers::QueryComplexity;
    ///
    /// assert_eq!(QueryComplexity::from_response("NO_RETRIEVAL"), QueryComplexity::NoRetrieval);
    /// assert_eq!(QueryComplexity::from_response("This is complex."), QueryComplexity::Complex);
    /// assert_eq!(QueryComplexity::from_response("unsure"), QueryComplexity::Simple);
    /// ```
    #[must_use]
    pub fn from_response(response: &str) -> Self {
        let response = response.to_lowercase();
        if response.contains("no_retrieval") {
            Self::NoRetrieval
        } else if response.contains("complex") {
            Self::Complex
        } else {
            Self::Simple
        }
    }

    /// Whether `response` names any of the three labels. Replies that do not
    /// fall back to [`QueryComplexity::Simple`] in [`from_response`](Self::from_response).
    #[must_use]
    pub fn is_recognized(response: &str) -> bool {
        let response = response.to_lowercase();
        [Self::NoRetrieval, Self::Simple, Self::Complex]
            .iter()
            .any(|label| response.contains(label.as_str()))
    }
}

impl fmt::Display for QueryComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retriever that asks a chat model how complex the query is and routes
/// it accordingly.
///
/// `no_retrieval` returns an empty list without touching any retriever.
/// Options are passed through unchanged to the chosen retriever.
#[derive(Debug, Clone)]
pub struct AdaptiveRetriever {
    llm: Arc<dyn ChatModel>,
    simple: Arc<dyn Retriever>,
    complex: Arc<dyn Retriever>,
    hooks: Hooks,
}

impl AdaptiveRetriever {
    /// Create an adaptive retriever. Without a `complex` retriever the
    /// `simple` one handles complex queries too.
    pub fn new(
        llm: Arc<dyn ChatModel>,
        simple: Arc<dyn Retriever>,
        complex: Option<Arc<dyn Retriever>>,
    ) -> Self {
        let complex = complex.unwrap_or_else(|| Arc::clone(&simple));
        Self {
            llm,
            simple,
            complex,
            hooks: Hooks::default(),
        }
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Ask the chat model to classify `query`.
    ///
    /// # Errors
    ///
    /// Returns the chat model's error tagged `adaptive classify`.
    pub async fn classify(&self, query: &str) -> Result<QueryComplexity> {
        let prompt = format!(
            "Classify the following query by how much document retrieval it needs.\n\
             Answer with exactly one of: {}, {}, {}.\n\
             - {}: general knowledge the model can answer directly\n\
             - {}: a single lookup is enough\n\
             - {}: requires combining several sources or reasoning steps\n\n\
             Query: {query}",
            QueryComplexity::NoRetrieval,
            QueryComplexity::Simple,
            QueryComplexity::Complex,
            QueryComplexity::NoRetrieval,
            QueryComplexity::Simple,
            QueryComplexity::Complex,
        );

        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| e.in_stage("adaptive classify"))?;

        if !QueryComplexity::is_recognized(&reply) {
            warn!("Unrecognized classifier output {:?}, using simple retrieval", reply.trim());
        }
        Ok(QueryComplexity::from_response(&reply))
    }

    async fn route(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let complexity = self.classify(query).await?;
        debug!("Query classified as {}", complexity);

        match complexity {
            QueryComplexity::NoRetrieval => {
                warn!("Skipping retrieval for query classified as no_retrieval");
                Ok(Vec::new())
            }
            QueryComplexity::Simple => self
                .simple
                .retrieve(query, options)
                .await
                .map_err(|e| e.in_stage("adaptive simple")),
            QueryComplexity::Complex => self
                .complex
                .retrieve(query, options)
                .await
                .map_err(|e| e.in_stage("adaptive complex")),
        }
    }
}

#[async_trait]
impl Retriever for AdaptiveRetriever {
    #[instrument(skip(self, options), fields(retriever = "AdaptiveRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.route(query, options).await;
        self.hooks.run_after(&result);
        result
    }

    fn name(&self) -> &'static str {
        "AdaptiveRetriever"
    }
}
