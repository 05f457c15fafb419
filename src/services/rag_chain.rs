use std::sync::Arc;

use crate::{
    error::{AppError, AppResult, ResultExt},
    models::{ChatMessage, Document},
    services::{
        chat_history::ChatHistoryStore,
        providers::{ChatModel, VectorStore},
    },
};

/// Rewrites a follow-up question so it can be searched on its own
pub const CONTEXTUALIZE_PROMPT: &str =
    "Given the chat history and user question, rewrite it as a standalone question.";

const QA_PROMPT: &str = "You're a helpful e-commerce assistant specializing in product recommendations.

Use the provided product reviews and context to answer user questions accurately.

Guidelines:
- Base your response on the retrieved reviews and product information
- Be concise but informative
- If asked about products not in the context, mention that you specialize in products from the reviews
- Highlight key features, pros, and cons mentioned in reviews
- Suggest alternatives when appropriate

CONTEXT:
{context}

QUESTION: {input}";

const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Fills the answer prompt with the retrieved reviews and the user's question
pub fn qa_system_prompt(context: &str, input: &str) -> String {
    QA_PROMPT
        .replace("{context}", context)
        .replace("{input}", input)
}

/// Joins retrieved reviews into the prompt context
pub fn format_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

/// History-aware retrieval-augmented answer generation
///
/// Retrieval and generation both happen in hosted services; the chain only
/// decides what to ask them and in which order.
#[derive(Clone)]
pub struct RagChain {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn VectorStore>,
    k: usize,
    history: ChatHistoryStore,
}

impl RagChain {
    pub fn new(model: Arc<dyn ChatModel>, store: Arc<dyn VectorStore>, k: usize) -> Self {
        Self {
            model,
            store,
            k,
            history: ChatHistoryStore::new(),
        }
    }

    /// Replaces the default history store, e.g. to change its session limit
    pub fn with_history(mut self, history: ChatHistoryStore) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &ChatHistoryStore {
        &self.history
    }

    /// The query sent to the retriever.
    ///
    /// Without history the input is used as-is; otherwise the model rewrites it
    /// into a standalone question.
    async fn retrieval_query(&self, input: &str, history: &[ChatMessage]) -> AppResult<String> {
        if history.is_empty() {
            return Ok(input.to_string());
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(CONTEXTUALIZE_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::human(input));

        let rewritten = self
            .model
            .complete(&messages)
            .await
            .context("Failed to rewrite question from chat history")?;

        tracing::debug!(question = %input, rewritten = %rewritten, "Question contextualized");
        Ok(rewritten)
    }

    /// Answers `input` given the prior conversation in `history`
    pub async fn answer(&self, input: &str, history: &[ChatMessage]) -> AppResult<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
        }

        let query = self.retrieval_query(input, history).await?;
        let documents = self
            .store
            .similarity_search(&query, self.k)
            .await
            .context("Failed to retrieve product reviews")?;

        tracing::info!(
            retrieved = documents.len(),
            history_messages = history.len(),
            store = self.store.name(),
            "Reviews retrieved for question"
        );

        let context = format_context(&documents);
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(qa_system_prompt(&context, input)));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::human(input));

        self.model
            .complete(&messages)
            .await
            .context("Failed to generate answer")
    }

    /// Answers within a session, recording the exchange in its history
    pub async fn invoke(&self, input: &str, session_id: &str) -> AppResult<String> {
        let history = self.history.messages(session_id).await;
        let answer = self.answer(input, &history).await?;
        self.history
            .append_exchange(session_id, input.trim(), &answer)
            .await;

        tracing::info!(
            session_id = %session_id,
            model = self.model.name(),
            "Question answered"
        );

        Ok(answer)
    }
}
