//! Retrieval strategies for the ragfuse RAG framework.
//!
//! This crate turns a query into a ranked list of documents. Every strategy
//! implements [`ragfuse_core::Retriever`], so strategies can be layered:
//! rerank after retrieve, an ensemble of retrievers, retrieve after a query
//! rewrite.
//!
//! - **Fusion**: Reciprocal Rank Fusion and weighted score fusion
//! - **Retrievers**: vector, ensemble, hybrid, multi-query, `HyDE`,
//!   adaptive, corrective (CRAG) and rerank strategies
//! - **Hooks and middleware**: before/after interception around any retriever
//! - **Registry**: build retrievers by name from configuration
//! - **Generator**: a [`ragfuse_core::ChatModel`] adapter for Siumai clients
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ragfuse_query::prelude::*;
//!
//! # async fn example(
//! #     store: Arc<dyn VectorStore>,
//! #     embedder: Arc<dyn Embedder>,
//! #     bm25: Arc<dyn Bm25Searcher>,
//! #     reranker: Arc<dyn Reranker>,
//! # ) -> Result<()> {
//! let hybrid = Arc::new(HybridRetriever::new(store, embedder, bm25));
//! let retriever = RerankRetriever::new(hybrid, reranker).with_top_n(5);
//!
//! let docs = retriever
//!     .retrieve("What is reciprocal rank fusion?", &RetrievalOptions::new().with_top_k(20))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Query → [middleware] → Strategy ─┬→ Embedder → VectorStore
//!                                  ├→ Bm25Searcher / WebSearcher
//!                                  ├→ ChatModel (rewrite, classify, grade)
//!                                  └→ inner Retrievers → Fusion → Reranker
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fusion;
pub mod generator;
pub mod hooks;
pub mod middleware;
pub mod registry;
pub mod retrievers;

/// Re-export commonly used types and traits.
pub mod prelude {
    pub use crate::fusion::{
        FusionStrategy, RrfStrategy, WeightedStrategy, dedup, sort_by_score, truncate_top_k,
    };
    pub use crate::generator::SiumaiChatModel;
    pub use crate::hooks::{Hooks, compose_hooks};
    pub use crate::middleware::{HookedRetriever, Middleware, apply_middleware, with_hooks};
    pub use crate::registry::{RetrieverFactory, RetrieverRegistry};
    pub use crate::retrievers::{
        AdaptiveRetriever, CragRetriever, EnsembleRetriever, HybridRetriever, HydeRetriever,
        MultiQueryRetriever, QueryComplexity, RerankRetriever, VectorStoreRetriever,
    };

    // Re-export core types
    pub use ragfuse_core::prelude::*;
}
