//! [`ChatModel`] adapter for Siumai LLM clients.
//!
//! Siumai provides a unified interface over `OpenAI`, Anthropic, Ollama and
//! other providers. Wrapping a client in [`SiumaiChatModel`] lets it drive
//! the query rewriting, classification and grading steps of the retrievers.

use async_trait::async_trait;
use siumai::MessageContent;
use siumai::prelude::*;
use siumai::types::{ChatMessage as SiumaiMessage, ContentPart};
use tracing::{debug, instrument};

use ragfuse_core::{
    ChatMessage, ChatResponse, MessageRole, RagfuseError, Result, traits::ChatModel,
};

/// A [`ChatModel`] backed by a Siumai client.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use siumai::prelude::*;
/// use ragfuse_query::generator::SiumaiChatModel;
/// use ragfuse_query::retrievers::AdaptiveRetriever;
/// # use ragfuse_core::traits::Retriever;
///
/// # async fn example(simple: Arc<dyn Retriever>) -> Result<(), Box<dyn std::error::Error>> {
/// let client = LlmBuilder::new()
///     .openai()
///     .api_key("your-api-key")
///     .model("gpt-4o-mini")
///     .build()
///     .await?;
///
/// let llm = Arc::new(SiumaiChatModel::new(Box::new(client), "gpt-4o-mini"));
/// let adaptive = AdaptiveRetriever::new(llm, simple, None);
/// # Ok(())
/// # }
/// ```
pub struct SiumaiChatModel {
    client: Box<dyn LlmClient>,
    model: String,
    system_prompt: Option<String>,
}

impl SiumaiChatModel {
    /// Wrap a Siumai client. `model` is reported by [`ChatModel::model_id`].
    pub fn new<S: Into<String>>(client: Box<dyn LlmClient>, model: S) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: None,
        }
    }

    /// Prepend a system message to every request.
    #[must_use]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    fn convert_messages(&self, messages: &[ChatMessage]) -> Vec<SiumaiMessage> {
        to_siumai_messages(self.system_prompt.as_deref(), messages)
    }
}

/// Convert a conversation into Siumai messages, with the optional system
/// prompt first.
fn to_siumai_messages(system_prompt: Option<&str>, messages: &[ChatMessage]) -> Vec<SiumaiMessage> {
    let mut converted = Vec::with_capacity(messages.len() + 1);
    if let Some(system_prompt) = system_prompt {
        converted.push(system!(system_prompt.to_string()));
    }
    for message in messages {
        let content = message.content.clone();
        converted.push(match message.role {
            MessageRole::System => system!(content),
            MessageRole::User => user!(content),
            MessageRole::Assistant => assistant!(content),
        });
    }
    converted
}

/// Extract the text of a response. Multimodal text parts are joined with a
/// space; a response with no text part at all is an LLM error.
fn response_text(content: &MessageContent) -> Result<String> {
    match content {
        MessageContent::Text(text) => Ok(text.clone()),
        MessageContent::MultiModal(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            if texts.is_empty() {
                return Err(RagfuseError::llm(
                    "Unsupported content type in LLM response",
                ));
            }
            Ok(texts.join(" "))
        }
    }
}

impl Clone for SiumaiChatModel {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone_box(),
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
        }
    }
}

impl std::fmt::Debug for SiumaiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiumaiChatModel")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt.is_some())
            .field("client", &"<LlmClient>")
            .finish()
    }
}

#[async_trait]
impl ChatModel for SiumaiChatModel {
    #[instrument(skip(self, messages), fields(generator = "SiumaiChatModel"))]
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let request = self.convert_messages(messages);
        let response = self
            .client
            .chat(request)
            .await
            .map_err(|e| RagfuseError::llm(format!("Siumai generation failed: {e}")))?;

        let text = response_text(&response.content)?;
        debug!("Received {} characters from model", text.len());

        Ok(ChatResponse {
            content: text,
            model: response.model.clone().or_else(|| Some(self.model.clone())),
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
