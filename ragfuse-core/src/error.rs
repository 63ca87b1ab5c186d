//! Error types for the ragfuse framework.
//!
//! Collaborator failures (embedding, vector search, generation, keyword or web
//! search, reranking) are wrapped with a short stage tag naming the component
//! and sub-step that failed, then propagated unchanged. Configuration and
//! parse errors are returned directly. Hook aborts are never wrapped.

use thiserror::Error;

/// Core error types for the ragfuse framework.
#[derive(Error, Debug)]
pub enum RagfuseError {
    /// I/O related errors (configuration files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Embedding generation errors
    #[error("Embedding error: {message}")]
    Embedding {
        /// Detailed error message
        message: String,
    },

    /// Vector store operation errors
    #[error("Vector store error: {message}")]
    VectorStore {
        /// Detailed error message
        message: String,
    },

    /// Chat model generation errors
    #[error("LLM error: {message}")]
    Llm {
        /// Detailed error message
        message: String,
    },

    /// Keyword (BM25) or web search errors
    #[error("Search error: {message}")]
    Search {
        /// Detailed error message
        message: String,
    },

    /// Reranker errors
    #[error("Rerank error: {message}")]
    Rerank {
        /// Detailed error message
        message: String,
    },

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// Unparseable model output
    #[error("Parse error: {message}")]
    Parse {
        /// Detailed error message
        message: String,
    },

    /// A `before_retrieve` hook rejected the call
    #[error("Hook rejected retrieval: {message}")]
    Hook {
        /// Reason given by the hook
        message: String,
    },

    /// A failure inside a named retrieval stage.
    #[error("{stage}: {source}")]
    Stage {
        /// Component and sub-step, e.g. `hybrid bm25 search`
        stage: String,
        /// The underlying error
        #[source]
        source: Box<RagfuseError>,
    },

    /// Errors raised by collaborator implementations that have no
    /// dedicated variant, typically converted with `?` from `anyhow::Error`.
    #[error("External error: {source}")]
    External {
        /// The underlying error
        #[source]
        source: anyhow::Error,
    },
}

impl RagfuseError {
    /// Create a new embedding error with a message.
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a new vector store error with a message.
    pub fn vector_store<S: Into<String>>(message: S) -> Self {
        Self::VectorStore {
            message: message.into(),
        }
    }

    /// Create a new LLM error with a message.
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Create a new search error with a message.
    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Create a new rerank error with a message.
    pub fn rerank<S: Into<String>>(message: S) -> Self {
        Self::Rerank {
            message: message.into(),
        }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new parse error with a message.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new hook rejection error.
    pub fn hook<S: Into<String>>(message: S) -> Self {
        Self::Hook {
            message: message.into(),
        }
    }

    /// Create a new external error from any error that implements `Into<anyhow::Error>`.
    pub fn external<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::External {
            source: error.into(),
        }
    }

    /// Wrap this error with a stage tag.
    ///
    /// ```rust
    /// use ragfuse_core::RagfuseError;
    ///
    /// let err = RagfuseError::search("index offline").in_stage("hybrid bm25 search");
    /// assert_eq!(err.to_string(), "hybrid bm25 search: Search error: index offline");
    /// ```
    #[must_use]
    pub fn in_stage<S: Into<String>>(self, stage: S) -> Self {
        Self::Stage {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// The stage tag of the outermost wrapper, if any.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// The innermost error with every stage wrapper removed.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Stage { source, .. } = current {
            current = source;
        }
        current
    }

    /// Check if this error is retryable.
    ///
    /// The retrieval core never retries; this is for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), Self::Io(_))
    }

    /// Check if this error was caused by invalid configuration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self.root(), Self::Configuration { .. })
    }
}

/// Convert from `anyhow::Error` to `RagfuseError`.
impl From<anyhow::Error> for RagfuseError {
    fn from(error: anyhow::Error) -> Self {
        Self::External { source: error }
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, RagfuseError>;
