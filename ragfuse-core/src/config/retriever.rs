//! Retriever configuration used by the registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::{RagfuseError, Result, RetrievalOptions, types::DEFAULT_TOP_K};

/// Configuration for constructing a retriever by name.
///
/// `options` carries provider-specific settings (RRF `k`, prompt templates,
/// thresholds, ...) that factories read through the typed accessors.
///
/// # Examples
///
/// ```rust
/// use ragfuse_core::config::RetrieverConfig;
///
/// let config = RetrieverConfig::from_json_str(r#"{
///     "provider": "hybrid",
///     "top_k": 5,
///     "options": { "rrf_k": 30 }
/// }"#).unwrap();
///
/// assert_eq!(config.provider, "hybrid");
/// assert_eq!(config.option_usize("rrf_k"), Some(30));
/// assert_eq!(config.default_options().top_k, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrieverConfig {
    /// Registered provider name.
    pub provider: String,

    /// Default number of results for calls made with [`default_options`](Self::default_options).
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Default minimum score (`0.0` = unset).
    #[serde(default)]
    pub threshold: f64,

    /// Provider-specific options.
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl RetrieverConfig {
    /// Create a configuration for the given provider with defaults.
    pub fn new<S: Into<String>>(provider: S) -> Self {
        Self {
            provider: provider.into(),
            top_k: DEFAULT_TOP_K,
            threshold: 0.0,
            options: HashMap::new(),
        }
    }

    /// Set the default top-k.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the default threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Add a provider-specific option.
    #[must_use]
    pub fn with_option<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading retriever config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(RagfuseError::configuration(
                "retriever provider name cannot be empty",
            ));
        }
        if !self.threshold.is_finite() {
            return Err(RagfuseError::configuration(format!(
                "retriever threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Per-call options seeded from this configuration.
    #[must_use]
    pub fn default_options(&self) -> RetrievalOptions {
        RetrievalOptions::new()
            .with_top_k(self.top_k)
            .with_threshold(self.threshold)
    }

    /// String option.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(serde_json::Value::as_str)
    }

    /// Floating point option.
    pub fn option_f64(&self, key: &str) -> Option<f64> {
        self.options.get(key).and_then(serde_json::Value::as_f64)
    }

    /// Unsigned integer option.
    pub fn option_usize(&self, key: &str) -> Option<usize> {
        self.options
            .get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|value| usize::try_from(value).ok())
    }
}
