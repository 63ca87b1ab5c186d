//! The retrieval contract shared by every strategy.
//!
//! Strategies layer by holding other retrievers behind `Arc<dyn Retriever>`:
//! rerank-after-retrieve, ensembles of retrievers, retrieve-after-rewrite.

use async_trait::async_trait;

use crate::{Document, Result, RetrievalOptions};

/// Turns a natural-language query into a ranked list of documents.
///
/// Implementations are long-lived, shared and stateless beyond immutable
/// configuration, so `retrieve` may be called concurrently. Dropping the
/// returned future cancels whichever collaborator call is in flight.
///
/// # Examples
///
/// ```rust,no_run
/// use ragfuse_core::traits::Retriever;
/// use ragfuse_core::{Document, Result, RetrievalOptions};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct StaticRetriever {
///     documents: Vec<Document>,
/// }
///
/// #[async_trait]
/// impl Retriever for StaticRetriever {
///     async fn retrieve(&self, _query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
///         let mut documents = self.documents.clone();
///         if let Some(limit) = options.limit() {
///             documents.truncate(limit);
///         }
///         Ok(documents)
///     }
/// }
/// ```
#[async_trait]
pub trait Retriever: Send + Sync + std::fmt::Debug {
    /// Retrieve documents for a query.
    ///
    /// # Errors
    ///
    /// Collaborator failures are returned wrapped with a stage tag. An error
    /// from a `before_retrieve` hook is returned as-is.
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>>;

    /// Get a human-readable name for this retriever.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
