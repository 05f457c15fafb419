pub mod chat_history;
pub mod data_converter;
pub mod data_ingestion;
pub mod providers;
pub mod rag_chain;

pub use chat_history::{ChatHistoryStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_ID};
pub use data_converter::DataConverter;
pub use data_ingestion::DataIngestor;
pub use rag_chain::RagChain;
