use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::{
        providers::{AstraDbVectorStore, ChatModel, GroqChatModel, HuggingFaceEmbedder, VectorStore},
        ChatHistoryStore, RagChain,
    },
};

fn required(value: &Option<String>, name: &str) -> AppResult<String> {
    value
        .clone()
        .ok_or_else(|| AppError::Config(format!("Missing required environment variables: {}", name)))
}

/// AstraDB store embedding through the HuggingFace inference API
pub fn build_vector_store(config: &Config) -> AppResult<Arc<dyn VectorStore>> {
    let embedder = HuggingFaceEmbedder::new(
        config.hf_api_url.clone(),
        config.embedding_model.clone(),
        config.hf_token.clone(),
    );
    tracing::info!(model = %config.embedding_model, "Initialized embedding model");

    let store = AstraDbVectorStore::new(
        required(&config.astra_db_api_endpoint, "ASTRA_DB_API_ENDPOINT")?,
        required(&config.astra_db_application_token, "ASTRA_DB_APPLICATION_TOKEN")?,
        required(&config.astra_db_keyspace, "ASTRA_DB_KEYSPACE")?,
        config.collection_name.clone(),
        Arc::new(embedder),
    );
    tracing::info!(collection = %config.collection_name, "Connected to AstraDB vector store");

    Ok(Arc::new(store))
}

pub fn build_chat_model(config: &Config) -> AppResult<Arc<dyn ChatModel>> {
    let model = GroqChatModel::new(
        required(&config.groq_api_key, "GROQ_API_KEY")?,
        config.groq_api_url.clone(),
        config.rag_model.clone(),
        config.rag_temperature,
    );
    Ok(Arc::new(model))
}

/// Chain answering over `store` with the configured Groq model
pub fn build_rag_chain(config: &Config, store: Arc<dyn VectorStore>) -> AppResult<RagChain> {
    let model = build_chat_model(config)?;
    let history = ChatHistoryStore::with_max_sessions(config.max_chat_sessions);
    Ok(RagChain::new(model, store, config.retriever_k).with_history(history))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        Config::from_vars(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string()))).unwrap()
    }

    #[test]
    fn test_build_vector_store_requires_astra_credentials() {
        let err = build_vector_store(&config(&[])).err().unwrap();
        assert!(err.to_string().contains("ASTRA_DB_API_ENDPOINT"));
    }

    #[test]
    fn test_build_components() {
        let config = config(&[
            ("ASTRA_DB_API_ENDPOINT", "https://db.example.com"),
            ("ASTRA_DB_APPLICATION_TOKEN", "AstraCS:token"),
            ("ASTRA_DB_KEYSPACE", "default_keyspace"),
            ("GROQ_API_KEY", "gsk_test"),
        ]);

        let store = build_vector_store(&config).unwrap();
        assert_eq!(store.name(), "astra_db");

        let model = build_chat_model(&config).unwrap();
        assert_eq!(model.name(), "groq");

        let chain = build_rag_chain(&config, store).unwrap();
        assert_eq!(chain.history().max_sessions(), 1000);
    }
}
