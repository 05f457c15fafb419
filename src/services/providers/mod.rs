/// Hosted service abstraction
///
/// The recommender owns no indexing or generation logic of its own. Embedding,
/// vector search and answer generation are each delegated to a hosted API
/// behind one of these traits, so the chain and the web layer can be exercised
/// against in-process fakes.
use reqwest::Response;

use crate::{
    error::{AppError, AppResult},
    models::{ChatMessage, Document},
};

pub mod astra_db;
pub mod groq;
pub mod huggingface;

pub use astra_db::AstraDbVectorStore;
pub use groq::GroqChatModel;
pub use huggingface::HuggingFaceEmbedder;

/// Turns text into dense vectors
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts, one vector per input in the same order
    async fn embed_documents(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Embeds a single search query
    async fn embed_query(&self, text: &str) -> AppResult<Vec<f32>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Document storage with similarity search
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Embeds and stores documents, returning their ids
    async fn add_documents(&self, documents: &[Document]) -> AppResult<Vec<String>>;

    /// Returns the `k` documents closest to `query`
    async fn similarity_search(&self, query: &str, k: usize) -> AppResult<Vec<Document>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Chat-completion language model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the model's reply to the conversation in `messages`
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fails with the status and body when a hosted API returns a non-2xx response.
pub(crate) async fn ensure_success(response: Response, provider: &str) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalApi(format!(
        "{} API returned status {}: {}",
        provider, status, body
    )))
}
