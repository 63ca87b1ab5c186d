//! Fan a query out to several retrievers and fuse their results.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use ragfuse_core::{Document, Result, RetrievalOptions, traits::Retriever};

use crate::fusion::{FusionStrategy, RrfStrategy, truncate_top_k};
use crate::hooks::Hooks;

/// A retriever that combines the results of several inner retrievers.
///
/// Every inner retriever receives the same query and options. The first
/// failure aborts the call and is tagged with the failing retriever's index
/// (`ensemble retriever {i}`). The fused list is truncated to `top_k`.
///
/// Inner retrievers run one after another unless
/// [`with_concurrent`](Self::with_concurrent) is enabled.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ragfuse_core::prelude::*;
/// use ragfuse_query::fusion::WeightedStrategy;
/// use ragfuse_query::retrievers::EnsembleRetriever;
///
/// # async fn example(dense: Arc<dyn Retriever>, sparse: Arc<dyn Retriever>) -> Result<()> {
/// let ensemble = EnsembleRetriever::new(
///     vec![dense, sparse],
///     Some(Arc::new(WeightedStrategy::new(vec![0.7, 0.3]))),
/// )
/// .with_concurrent(true);
///
/// let docs = ensemble.retrieve("rust async", &RetrievalOptions::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EnsembleRetriever {
    retrievers: Vec<Arc<dyn Retriever>>,
    fusion: Arc<dyn FusionStrategy>,
    concurrent: bool,
    hooks: Hooks,
}

impl EnsembleRetriever {
    /// Create an ensemble. `fusion` defaults to RRF with `k = 60`.
    pub fn new(
        retrievers: Vec<Arc<dyn Retriever>>,
        fusion: Option<Arc<dyn FusionStrategy>>,
    ) -> Self {
        Self {
            retrievers,
            fusion: fusion.unwrap_or_else(|| Arc::new(RrfStrategy::default())),
            concurrent: false,
            hooks: Hooks::default(),
        }
    }

    /// Run the inner retrievers concurrently, failing on the first error.
    #[must_use]
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Number of inner retrievers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.retrievers.len()
    }

    /// True when there are no inner retrievers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retrievers.is_empty()
    }

    async fn collect(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Vec<Document>>> {
        if self.concurrent {
            let futures = self.retrievers.iter().enumerate().map(|(i, retriever)| async move {
                retriever
                    .retrieve(query, options)
                    .await
                    .map_err(|e| e.in_stage(format!("ensemble retriever {i}")))
            });
            return futures::future::try_join_all(futures).await;
        }

        let mut result_sets = Vec::with_capacity(self.retrievers.len());
        for (i, retriever) in self.retrievers.iter().enumerate() {
            let docs = retriever
                .retrieve(query, options)
                .await
                .map_err(|e| e.in_stage(format!("ensemble retriever {i}")))?;
            debug!("Retriever {} ({}) returned {} results", i, retriever.name(), docs.len());
            result_sets.push(docs);
        }
        Ok(result_sets)
    }

    async fn fuse(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        if self.retrievers.is_empty() {
            return Ok(Vec::new());
        }

        let result_sets = self.collect(query, options).await?;
        let mut fused = self
            .fusion
            .fuse(result_sets)
            .await
            .map_err(|e| e.in_stage("ensemble fuse"))?;
        truncate_top_k(&mut fused, options.top_k);
        Ok(fused)
    }
}

#[async_trait]
impl Retriever for EnsembleRetriever {
    #[instrument(skip(self, options), fields(retriever = "EnsembleRetriever", top_k = options.top_k))]
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        debug!(
            "Querying {} retrievers with {} fusion",
            self.retrievers.len(),
            self.fusion.name()
        );
        let result = self.fuse(query, options).await;
        self.hooks.run_after(&result);

        if let Ok(docs) = &result {
            info!("Ensemble retrieval completed: {} results", docs.len());
        }
        result
    }

    fn name(&self) -> &'static str {
        "EnsembleRetriever"
    }
}
