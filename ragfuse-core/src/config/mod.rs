//! Configuration types for the ragfuse framework.
//!
//! Configurations are serializable and validatable so retrievers can be
//! selected and tuned from files at runtime.

pub mod retriever;

pub use retriever::RetrieverConfig;
