//! Core data types.

pub mod document;
pub mod message;
pub mod options;

pub use document::Document;
pub use message::{ChatMessage, ChatResponse, MessageRole};
pub use options::{DEFAULT_TOP_K, RetrievalOptions, SearchOptions};
