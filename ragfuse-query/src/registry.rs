//! Name-to-factory registry for building retrievers from configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use ragfuse_core::{RagfuseError, Result, config::RetrieverConfig, traits::Retriever};

/// Builds a retriever from configuration.
pub type RetrieverFactory =
    Arc<dyn Fn(&RetrieverConfig) -> Result<Arc<dyn Retriever>> + Send + Sync>;

/// Registry of retriever factories keyed by provider name.
///
/// Safe to share between threads; registration and lookup may happen
/// concurrently.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ragfuse_core::config::RetrieverConfig;
/// use ragfuse_query::registry::RetrieverRegistry;
/// # use ragfuse_core::traits::{Embedder, Retriever, VectorStore};
/// # use ragfuse_query::retrievers::VectorStoreRetriever;
/// # fn example(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> ragfuse_core::Result<()> {
///
/// let registry = RetrieverRegistry::new();
/// registry.register("vector", move |_config: &RetrieverConfig| {
///     let retriever: Arc<dyn Retriever> =
///         Arc::new(VectorStoreRetriever::new(Arc::clone(&store), Arc::clone(&embedder)));
///     Ok(retriever)
/// });
///
/// let retriever = registry.create_from_config(&RetrieverConfig::new("vector"))?;
/// assert_eq!(registry.list(), vec!["vector"]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RetrieverRegistry {
    factories: RwLock<HashMap<String, RetrieverFactory>>,
}

impl RetrieverRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register<S, F>(&self, name: S, factory: F)
    where
        S: Into<String>,
        F: Fn(&RetrieverConfig) -> Result<Arc<dyn Retriever>> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering retriever provider: {}", name);
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(factory));
    }

    /// Build the retriever registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error, a configuration error naming
    /// the registered providers when `name` is unknown, or the factory's
    /// own error unchanged.
    pub fn create(&self, name: &str, config: &RetrieverConfig) -> Result<Arc<dyn Retriever>> {
        config.validate()?;

        let factory = {
            let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
            factories.get(name).cloned()
        };
        let Some(factory) = factory else {
            return Err(RagfuseError::configuration(format!(
                "retriever: unknown provider {name:?} (registered: [{}])",
                self.list().join(", ")
            )));
        };

        let retriever = factory(config)?;
        info!("Created retriever {} for provider {}", retriever.name(), name);
        Ok(retriever)
    }

    /// Build the retriever named by `config.provider`.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_from_config(&self, config: &RetrieverConfig) -> Result<Arc<dyn Retriever>> {
        self.create(&config.provider, config)
    }

    /// Registered provider names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// True if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Remove a provider. Returns true if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some()
    }
}

impl fmt::Debug for RetrieverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrieverRegistry")
            .field("providers", &self.list())
            .finish()
    }
}
