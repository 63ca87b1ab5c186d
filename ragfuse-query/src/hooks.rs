//! Before/after interception callbacks for retrieval calls.
//!
//! Every strategy retriever accepts a [`Hooks`] value through its
//! `with_hooks` builder method, and [`crate::middleware::with_hooks`] lets
//! any retriever be wrapped with one.

use std::fmt;
use std::sync::Arc;

use ragfuse_core::{Document, Result};

/// Called with the query before any work. An error aborts the call and is
/// returned to the caller unchanged.
pub type BeforeRetrieveFn = Arc<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Called with the outcome of a call, success or failure.
pub type AfterRetrieveFn = Arc<dyn Fn(&Result<Vec<Document>>) + Send + Sync>;

/// Called by the rerank retriever with the documents before and after reranking.
pub type OnRerankFn = Arc<dyn Fn(&str, &[Document], &[Document]) + Send + Sync>;

/// Optional callbacks around a retrieval call.
///
/// # Examples
///
/// ```rust
/// use ragfuse_query::hooks::Hooks;
/// use ragfuse_core::RagfuseError;
///
/// let hooks = Hooks::new()
///     .before_retrieve(|query| {
///         if query.is_empty() {
///             return Err(RagfuseError::hook("empty query"));
///         }
///         Ok(())
///     })
///     .after_retrieve(|result| {
///         if let Ok(docs) = result {
///             println!("retrieved {} documents", docs.len());
///         }
///     });
///
/// assert!(hooks.run_before("").is_err());
/// assert!(hooks.run_before("rust").is_ok());
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    before_retrieve: Option<BeforeRetrieveFn>,
    after_retrieve: Option<AfterRetrieveFn>,
    on_rerank: Option<OnRerankFn>,
}

impl Hooks {
    /// Create an empty set of hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `before_retrieve` callback.
    #[must_use]
    pub fn before_retrieve<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<()> + Send + Sync + 'static,
    {
        self.before_retrieve = Some(Arc::new(f));
        self
    }

    /// Set the `after_retrieve` callback.
    #[must_use]
    pub fn after_retrieve<F>(mut self, f: F) -> Self
    where
        F: Fn(&Result<Vec<Document>>) + Send + Sync + 'static,
    {
        self.after_retrieve = Some(Arc::new(f));
        self
    }

    /// Set the `on_rerank` callback.
    #[must_use]
    pub fn on_rerank<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[Document], &[Document]) + Send + Sync + 'static,
    {
        self.on_rerank = Some(Arc::new(f));
        self
    }

    /// True when no callback is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before_retrieve.is_none() && self.after_retrieve.is_none() && self.on_rerank.is_none()
    }

    /// Run `before_retrieve`, if set.
    pub fn run_before(&self, query: &str) -> Result<()> {
        match &self.before_retrieve {
            Some(before) => before(query),
            None => Ok(()),
        }
    }

    /// Run `after_retrieve`, if set.
    pub fn run_after(&self, result: &Result<Vec<Document>>) {
        if let Some(after) = &self.after_retrieve {
            after(result);
        }
    }

    /// Run `on_rerank`, if set.
    pub fn run_on_rerank(&self, query: &str, before: &[Document], after: &[Document]) {
        if let Some(on_rerank) = &self.on_rerank {
            on_rerank(query, before, after);
        }
    }

    /// Merge several hook sets into one.
    ///
    /// `before_retrieve` callbacks run in order and the first error stops
    /// the rest. `after_retrieve` and `on_rerank` callbacks all run, in order.
    #[must_use]
    pub fn compose<I>(hooks: I) -> Self
    where
        I: IntoIterator<Item = Hooks>,
    {
        let hooks: Vec<Hooks> = hooks.into_iter().collect();

        let befores: Vec<BeforeRetrieveFn> = hooks
            .iter()
            .filter_map(|h| h.before_retrieve.clone())
            .collect();
        let afters: Vec<AfterRetrieveFn> = hooks
            .iter()
            .filter_map(|h| h.after_retrieve.clone())
            .collect();
        let reranks: Vec<OnRerankFn> = hooks.iter().filter_map(|h| h.on_rerank.clone()).collect();

        let mut composed = Hooks::new();
        if !befores.is_empty() {
            composed = composed.before_retrieve(move |query| {
                befores.iter().try_for_each(|before| before(query))
            });
        }
        if !afters.is_empty() {
            composed = composed.after_retrieve(move |result| {
                for after in &afters {
                    after(result);
                }
            });
        }
        if !reranks.is_empty() {
            composed = composed.on_rerank(move |query, before, after| {
                for on_rerank in &reranks {
                    on_rerank(query, before, after);
                }
            });
        }
        composed
    }
}

/// Merge several hook sets into one. See [`Hooks::compose`].
#[must_use]
pub fn compose_hooks<I>(hooks: I) -> Hooks
where
    I: IntoIterator<Item = Hooks>,
{
    Hooks::compose(hooks)
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_retrieve", &self.before_retrieve.is_some())
            .field("after_retrieve", &self.after_retrieve.is_some())
            .field("on_rerank", &self.on_rerank.is_some())
            .finish()
    }
}
