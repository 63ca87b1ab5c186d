//! Core traits for the retrieval framework.
//!
//! [`Retriever`] is the contract every strategy implements. The remaining
//! traits describe the external collaborators strategies consume:
//!
//! - [`Embedder`] - dense embedding generation
//! - [`VectorStore`] - similarity search over stored embeddings
//! - [`ChatModel`] - text generation for rewriting, classification and grading
//! - [`Bm25Searcher`] / [`WebSearcher`] - keyword and web search
//! - [`Reranker`] - secondary relevance scoring

pub mod embedder;
pub mod generator;
pub mod retriever;
pub mod search;
pub mod storage;

pub use embedder::Embedder;
pub use generator::ChatModel;
pub use retriever::Retriever;
pub use search::{Bm25Searcher, Reranker, WebSearcher};
pub use storage::VectorStore;
