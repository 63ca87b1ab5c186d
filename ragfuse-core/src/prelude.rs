//! Prelude module for convenient imports.
//!
//! ```rust
//! use ragfuse_core::prelude::*;
//!
//! let doc = Document::new("a", "Hello, world!");
//! let options = RetrievalOptions::default();
//! ```

pub use crate::error::{RagfuseError, Result};

pub use crate::types::{
    ChatMessage, ChatResponse, DEFAULT_TOP_K, Document, MessageRole, RetrievalOptions,
    SearchOptions,
};

pub use crate::traits::{
    Bm25Searcher, ChatModel, Embedder, Reranker, Retriever, VectorStore, WebSearcher,
};

pub use crate::config::RetrieverConfig;
