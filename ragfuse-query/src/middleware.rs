//! Decorator-style middleware for retrievers.
//!
//! A middleware takes a retriever and returns a new one wrapping it.
//! [`apply_middleware`] composes a list of them so that the first entry is
//! the outermost layer: it runs first on the way in and last on the way out.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use ragfuse_core::{Document, Result, RetrievalOptions, traits::Retriever};

use crate::hooks::Hooks;

/// Wraps a retriever with extra behavior.
///
/// Any `Fn(Arc<dyn Retriever>) -> Arc<dyn Retriever>` closure is a middleware.
/// The same base may be wrapped several times, so wrappers must not rely on
/// being the only layer.
pub trait Middleware: Send + Sync {
    /// Return a retriever that delegates to `next`.
    fn wrap(&self, next: Arc<dyn Retriever>) -> Arc<dyn Retriever>;
}

impl<F> Middleware for F
where
    F: Fn(Arc<dyn Retriever>) -> Arc<dyn Retriever> + Send + Sync,
{
    fn wrap(&self, next: Arc<dyn Retriever>) -> Arc<dyn Retriever> {
        self(next)
    }
}

/// Wrap `base` with `middlewares`; `middlewares[0]` becomes the outermost layer.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ragfuse_query::hooks::Hooks;
/// use ragfuse_query::middleware::{apply_middleware, with_hooks, Middleware};
/// # use ragfuse_core::traits::Retriever;
/// # fn example(base: Arc<dyn Retriever>) {
///
/// let logged = Hooks::new().after_retrieve(|result| {
///     tracing::info!(ok = result.is_ok(), "retrieval finished");
/// });
/// let retriever = apply_middleware(base, vec![Box::new(with_hooks(logged)) as Box<dyn Middleware>]);
/// # }
/// ```
pub fn apply_middleware(
    base: Arc<dyn Retriever>,
    middlewares: Vec<Box<dyn Middleware>>,
) -> Arc<dyn Retriever> {
    debug!("Applying {} middleware layers", middlewares.len());
    middlewares
        .iter()
        .rev()
        .fold(base, |next, middleware| middleware.wrap(next))
}

/// Middleware that runs `hooks` around every call.
pub fn with_hooks(hooks: Hooks) -> impl Middleware {
    move |next: Arc<dyn Retriever>| -> Arc<dyn Retriever> {
        Arc::new(HookedRetriever::new(next, hooks.clone()))
    }
}

/// A retriever that runs [`Hooks`] around an inner retriever.
///
/// `before_retrieve` errors are returned unchanged and the inner retriever is
/// not called. `after_retrieve` sees the inner result, including errors.
#[derive(Debug, Clone)]
pub struct HookedRetriever {
    inner: Arc<dyn Retriever>,
    hooks: Hooks,
}

impl HookedRetriever {
    /// Create a hooked retriever.
    pub fn new(inner: Arc<dyn Retriever>, hooks: Hooks) -> Self {
        Self { inner, hooks }
    }
}

#[async_trait]
impl Retriever for HookedRetriever {
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.hooks.run_before(query)?;
        let result = self.inner.retrieve(query, options).await;
        self.hooks.run_after(&result);
        result
    }

    fn name(&self) -> &'static str {
        "HookedRetriever"
    }
}
