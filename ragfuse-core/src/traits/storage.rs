//! Vector storage and similarity search traits.

use async_trait::async_trait;

use crate::{Document, Result, SearchOptions};

/// Stores embeddings and performs similarity search.
///
/// Implementations back onto a vector database (Qdrant, pgvector, an
/// in-memory index, ...). The retrieval core only calls [`search`](Self::search).
#[async_trait]
pub trait VectorStore: Send + Sync + std::fmt::Debug {
    /// Add documents with their embeddings. `embeddings[i]` belongs to `documents[i]`.
    async fn add(&self, documents: Vec<Document>, embeddings: Vec<Vec<f32>>) -> Result<()>;

    /// Return up to `k` documents most similar to `embedding`, highest score first.
    ///
    /// Implementations must honor `options.threshold` and `options.filter`.
    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
        options: &SearchOptions,
    ) -> Result<Vec<Document>>;

    /// Delete documents by identifier.
    async fn delete(&self, ids: Vec<String>) -> Result<()>;

    /// Get a human-readable name for this vector store.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
