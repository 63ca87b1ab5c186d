//! # ragfuse Core
//!
//! Core traits, types, and interfaces for the ragfuse retrieval framework.
//!
//! This crate provides the foundational building blocks shared by every
//! retrieval strategy:
//!
//! - **Data structures**: [`Document`], [`RetrievalOptions`], [`SearchOptions`], chat messages
//! - **Core traits**: [`Retriever`] and the collaborator traits it composes
//!   (`Embedder`, `VectorStore`, `ChatModel`, `Bm25Searcher`, `WebSearcher`, `Reranker`)
//! - **Configuration**: [`config::RetrieverConfig`] for registry-driven construction
//! - **Error handling**: [`RagfuseError`] with stage-tagged wrapping
//!
//! ## Quick Start
//!
//! ```rust
//! use ragfuse_core::prelude::*;
//!
//! let doc = Document::new("doc-1", "This is a sample document").with_score(0.9);
//! let options = RetrievalOptions::new().with_top_k(3);
//!
//! assert_eq!(doc.score, 0.9);
//! assert_eq!(options.limit(), Some(3));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used types and traits
pub mod prelude;

// Core modules
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{RagfuseError, Result};
pub use types::{
    ChatMessage, ChatResponse, Document, MessageRole, RetrievalOptions, SearchOptions,
};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the ragfuse core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
