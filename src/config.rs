use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Largest `insertMany` the AstraDB Data API accepts
pub const MAX_INGEST_BATCH_SIZE: usize = 100;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// AstraDB Data API endpoint
    pub astra_db_api_endpoint: Option<String>,

    /// AstraDB application token
    pub astra_db_application_token: Option<String>,

    /// AstraDB keyspace (namespace)
    pub astra_db_keyspace: Option<String>,

    /// Groq API key
    pub groq_api_key: Option<String>,

    /// HuggingFace inference token. Anonymous calls work but are rate limited.
    #[serde(default)]
    pub hf_token: Option<String>,

    /// HuggingFace model used for text embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Groq model used for answer generation
    #[serde(default = "default_rag_model")]
    pub rag_model: String,

    #[serde(default = "default_rag_temperature")]
    pub rag_temperature: f32,

    /// Number of reviews retrieved per question
    #[serde(default = "default_retriever_k")]
    pub retriever_k: usize,

    /// Vector store collection holding the review embeddings
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Review CSV used by ingestion
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    #[serde(default = "default_ingest_batch_size")]
    pub ingest_batch_size: usize,

    /// Chat sessions held in memory before the least recently active is dropped
    #[serde(default = "default_max_chat_sessions")]
    pub max_chat_sessions: usize,

    /// Groq OpenAI-compatible API base URL
    #[serde(default = "default_groq_api_url")]
    pub groq_api_url: String,

    /// HuggingFace inference API base URL
    #[serde(default = "default_hf_api_url")]
    pub hf_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory for daily log files
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_embedding_model() -> String {
    "BAAI/bge-base-en-v1.5".to_string()
}

fn default_rag_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_rag_temperature() -> f32 {
    0.5
}

fn default_retriever_k() -> usize {
    5
}

fn default_collection_name() -> String {
    "flipkart_database".to_string()
}

fn default_csv_path() -> String {
    "Data/flipkart_product_review.csv".to_string()
}

fn default_ingest_batch_size() -> usize {
    50
}

fn default_max_chat_sessions() -> usize {
    1000
}

fn default_groq_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_hf_api_url() -> String {
    "https://router.huggingface.co/hf-inference".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Checks that every credential the hosted services need is present.
    ///
    /// Reports all missing variables at once rather than stopping at the first.
    pub fn validate(&self) -> AppResult<()> {
        let required = [
            ("ASTRA_DB_API_ENDPOINT", &self.astra_db_api_endpoint),
            ("ASTRA_DB_APPLICATION_TOKEN", &self.astra_db_application_token),
            ("ASTRA_DB_KEYSPACE", &self.astra_db_keyspace),
            ("GROQ_API_KEY", &self.groq_api_key),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        if !(1..=MAX_INGEST_BATCH_SIZE).contains(&self.ingest_batch_size) {
            return Err(AppError::Config(format!(
                "INGEST_BATCH_SIZE must be between 1 and {}, got {}",
                MAX_INGEST_BATCH_SIZE, self.ingest_batch_size
            )));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
