//! Corrective RAG: grade retrieved documents and fall back to web search.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use ragfuse_core::{
    Document, RagfuseError, Result, RetrievalOptions,
    traits::{ChatModel, Retriever, WebSearcher},
};

use crate::fusion::truncate_top_k;
use crate::hooks::Hooks;

/// Minimum number of web results requested on fallback.
pub const MIN_WEB_RESULTS: usize = 10;

/// A retriever that grades each retrieved document with a chat model.
///
/// The flow for one call:
///
/// 1. Retrieve from the inner retriever.
/// 2. Ask the model for a relevance score in `[-1, 1]` for every document,
///    one request per document. Replies are clamped into that range and
///    a reply that is not a number fails the call.
/// 3. Keep documents scoring at least `threshold`, in their original order,
///    with the clamped score as their new score. If any remain, truncate to
///    `top_k` and return.
/// 4. Otherwise, or when the inner retriever found nothing, search the web
///    for `max(top_k, 10)` results. Without a web searcher the result is
///    empty.
///
/// Web results are returned as the searcher ranks them, without truncation.
#[derive(Debug, Clone)]
pub struct CragRetriever {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn ChatModel>,
    web: Option<Arc<dyn WebSearcher>>,
    threshold: f64,
    hooks: Hooks,
}

impl CragRetriever {
    /// Create a CRAG retriever with threshold `0.0` and no web fallback.
    pub fn new(retriever: Arc<dyn Retriever>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            llm,
            web: None,
            threshold: 0.0,
            hooks: Hooks::default(),
        }
    }

    /// Set the web searcher used when retrieval is empty or irrelevant.
    #[must_use]
    pub fn with_web_searcher(mut self, web: Arc<dyn WebSearcher>) -> Self {
        self.web = Some(web);
        self
    }

    /// Set the minimum relevance score to keep a document.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The relevance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score a document's relevance to `query`, clamped into `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Fails with a stage `crag evaluate` error when the model call fails or
    /// its reply is not a number.
    pub async fn evaluate(&self, query: &str, doc: &Document) -> Result<f64> {
        let prompt = format!(
            "Rate how relevant the document is to the query on a scale from -1 \
             (irrelevant) to 1 (highly relevant).\n\
             Respond with a single number only.\n\n\
             Query: {query}\n\nDocument: {}",
            doc.content
        );

        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| e.in_stage("crag evaluate"))?;

        parse_relevance(&reply).map_err(|e| e.in_stage("crag evaluate"))
    }

    async fn correct(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let docs = self
            .retriever
            .retrieve(query, options)
            .await
            .map_err(|e| e.in_stage("crag inner retrieve"))?;

        if docs.is_empty() {
            debug!("Inner retriever returned no documents");
        } else {
            let total = docs.len();
            let mut relevant = Vec::with_capacity(total);
            for mut doc in docs {
                let score = self.evaluate(query, &doc).await?;
                if score >= self.threshold {
                    doc.score = score;
                    relevant.push(doc);
                }
            }

            if !relevant.is_empty() {
                info!("{} of {} documents judged relevant", relevant.len(), total);
                truncate_top_k(&mut relevant, options.top_k);
                return Ok(relevant);
            }
            debug!("No document reached threshold {}", self.threshold);
        }

        self.web_fallback(query, options).await
    }

    async fn web_fallback(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        let Some(web) = &self.web else {
            warn!("No relevant documents and no web searcher configured");
            return Ok(Vec::new());
        };

        let k = options.top_k.max(MIN_WEB_RESULTS);
        warn!("Falling back to web search for {} results", k);
        web.search(query, k)
            .await
            .map_err(|e| e.in_stage("crag web search"))
    }
}

/// Parse a relevance reply and clamp it into `[-1, 1]`.
fn parse_relevance(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let score: f64 = trimmed
        .parse()
        .map_err(|_| RagfuseError::parse(format!("relevance score {trimmed:?} is not a number")))?;
    if score.is_nan() {
        return Err(RagfuseError::parse("relevance score is NaN"));
    }
    Ok(score.clamp(-1.0, 1.0))
}

#[async_trait]
impl Retriever for CragRetriever {
    #[instrument(skip(self, options), fields(retriever = "CragRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.correct(query, options).await;
        self.hooks.run_after(&result);
        result
    }

    fn name(&self) -> &'static str {
        "CragRetriever"
    }
}
