//! Retrieval strategies.
//!
//! Every type here implements [`ragfuse_core::Retriever`] and accepts
//! [`crate::hooks::Hooks`] through a `with_hooks` builder method. Strategies
//! that wrap other retrievers take them as `Arc<dyn Retriever>`, so they can
//! be layered freely:
//!
//! - [`VectorStoreRetriever`] - embed the query, search a vector store
//! - [`EnsembleRetriever`] - fuse several retrievers
//! - [`HybridRetriever`] - vector plus BM25, fused with RRF
//! - [`MultiQueryRetriever`] - retrieve for LLM-generated query variants
//! - [`HydeRetriever`] - search with a hypothetical answer's embedding
//! - [`AdaptiveRetriever`] - route by classified query complexity
//! - [`CragRetriever`] - grade results, fall back to web search
//! - [`RerankRetriever`] - rerank and truncate another retriever's results

pub mod adaptive;
pub mod crag;
pub mod ensemble;
pub mod hybrid;
pub mod hyde;
pub mod multi_query;
pub mod rerank;
pub mod vector;

pub use adaptive::{AdaptiveRetriever, QueryComplexity};
pub use crag::CragRetriever;
pub use ensemble::EnsembleRetriever;
pub use hybrid::HybridRetriever;
pub use hyde::HydeRetriever;
pub use multi_query::MultiQueryRetriever;
pub use rerank::RerankRetriever;
pub use vector::VectorStoreRetriever;
