//! # ragfuse - Composable Retrieval for RAG
//!
//! ragfuse is the retrieval orchestration layer of a RAG
//! (Retrieval-Augmented Generation) application. It combines vector search,
//! keyword search, LLM query rewriting and relevance grading behind a single
//! async [`Retriever`](prelude::Retriever) trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use ragfuse::prelude::*;
//!
//! // Fuse two ranked lists with Reciprocal Rank Fusion
//! let dense = vec![Document::new("a", "Rust ownership"), Document::new("b", "Borrowing")];
//! let sparse = vec![Document::new("b", "Borrowing"), Document::new("c", "Lifetimes")];
//!
//! let fused = RrfStrategy::default().fuse_results(vec![dense, sparse]);
//! assert_eq!(fused[0].id, "b");
//! ```
//!
//! ## Architecture
//!
//! - **ragfuse-core**: documents, options, collaborator traits, errors, configuration
//! - **ragfuse-query**: fusion, retrieval strategies, hooks, middleware, registry

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public APIs from sub-crates
pub use ragfuse_core as core;
pub use ragfuse_query as query;

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types and traits from every ragfuse crate.
pub mod prelude {
    pub use ragfuse_query::prelude::*;
}

/// Version information for the ragfuse framework.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
