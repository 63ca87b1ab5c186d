//! Chat model trait used for query rewriting, classification and grading.

use async_trait::async_trait;

use crate::{ChatMessage, ChatResponse, Result};

/// Generates a chat completion.
///
/// Only non-streaming generation is needed by the retrieval strategies.
/// Credentials and retries against remote services belong to the implementor.
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Generate a response for the given conversation.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;

    /// Identifier of the underlying model.
    fn model_id(&self) -> &str {
        "unknown"
    }

    /// Convenience wrapper sending a single user message and returning the text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.generate(&[ChatMessage::user(prompt)]).await?;
        Ok(response.content)
    }
}
