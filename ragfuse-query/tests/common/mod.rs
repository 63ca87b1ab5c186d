//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ragfuse_core::{
    ChatMessage, ChatResponse, Document, RagfuseError, Result, RetrievalOptions, SearchOptions,
    traits::{Bm25Searcher, ChatModel, Embedder, Reranker, Retriever, VectorStore, WebSearcher},
};

/// Build documents with descending scores from IDs.
pub fn docs(ids: &[&str]) -> Vec<Document> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            #[allow(clippy::cast_precision_loss)]
            let score = 1.0 - i as f64 * 0.1;
            Document::new(*id, format!("content of {id}")).with_score(score)
        })
        .collect()
}

pub fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

/// Embedder returning a fixed vector and recording the embedded texts.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    pub fail: bool,
    pub texts: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(RagfuseError::embedding("model unavailable"));
        }
        Ok(vec![0.1, 0.2, 0.3, 0.4])
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        4
    }
}

/// Vector store returning canned documents and recording search calls.
#[derive(Debug, Default)]
pub struct MockVectorStore {
    pub docs: Vec<Document>,
    pub fail: bool,
    pub searches: Mutex<Vec<(usize, SearchOptions)>>,
}

impl MockVectorStore {
    pub fn with_docs(docs: Vec<Document>) -> Self {
        Self {
            docs,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn searches(&self) -> Vec<(usize, SearchOptions)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn add(&self, _documents: Vec<Document>, _embeddings: Vec<Vec<f32>>) -> Result<()> {
        Ok(())
    }

    async fn search(
        &self,
        _embedding: &[f32],
        k: usize,
        options: &SearchOptions,
    ) -> Result<Vec<Document>> {
        self.searches.lock().unwrap().push((k, options.clone()));
        if self.fail {
            return Err(RagfuseError::vector_store("connection refused"));
        }
        Ok(self.docs.clone())
    }

    async fn delete(&self, _ids: Vec<String>) -> Result<()> {
        Ok(())
    }
}

/// Keyword or web searcher returning canned documents.
#[derive(Debug, Default)]
pub struct MockSearcher {
    pub docs: Vec<Document>,
    pub fail: bool,
    pub ks: Mutex<Vec<usize>>,
}

impl MockSearcher {
    pub fn with_docs(docs: Vec<Document>) -> Self {
        Self {
            docs,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn ks(&self) -> Vec<usize> {
        self.ks.lock().unwrap().clone()
    }

    fn respond(&self, k: usize) -> Result<Vec<Document>> {
        self.ks.lock().unwrap().push(k);
        if self.fail {
            return Err(RagfuseError::search("search backend down"));
        }
        Ok(self.docs.clone())
    }
}

#[async_trait]
impl Bm25Searcher for MockSearcher {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<Document>> {
        self.respond(k)
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<Document>> {
        self.respond(k)
    }
}

type Responder = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Chat model answering every prompt through a closure.
pub struct MockChatModel {
    responder: Responder,
    pub prompts: Mutex<Vec<String>>,
    pub conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            prompts: Mutex::new(Vec::new()),
            conversations: Mutex::new(Vec::new()),
        }
    }

    /// A model that always gives the same reply.
    pub fn replying(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_| Ok(reply.clone()))
    }

    pub fn failing() -> Self {
        Self::new(|_| Err(RagfuseError::llm("rate limited")))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.conversations.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for MockChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockChatModel").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt.clone());
        self.conversations.lock().unwrap().push(messages.to_vec());
        (self.responder)(&prompt).map(ChatResponse::new)
    }
}

/// Retriever returning canned documents and recording its calls.
#[derive(Debug, Default)]
pub struct MockRetriever {
    pub docs: Vec<Document>,
    pub fail: bool,
    pub queries: Mutex<Vec<String>>,
    pub options: Mutex<Vec<RetrievalOptions>>,
}

impl MockRetriever {
    pub fn with_docs(docs: Vec<Document>) -> Self {
        Self {
            docs,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_options(&self) -> Option<RetrievalOptions> {
        self.options.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn retrieve(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<Document>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.options.lock().unwrap().push(options.clone());
        if self.fail {
            return Err(RagfuseError::vector_store("index missing"));
        }
        Ok(self.docs.clone())
    }
}

/// Reranker that reverses the input and counts its calls.
#[derive(Debug, Default)]
pub struct ReversingReranker {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl ReversingReranker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reranker for ReversingReranker {
    async fn rerank(&self, _query: &str, mut documents: Vec<Document>) -> Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagfuseError::rerank("cross-encoder crashed"));
        }
        documents.reverse();
        Ok(documents)
    }
}
