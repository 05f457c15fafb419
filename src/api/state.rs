use std::sync::Arc;

use crate::services::RagChain;

use super::Metrics;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag_chain: Arc<RagChain>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Creates the state around a built chain with fresh counters
    pub fn new(rag_chain: RagChain) -> Self {
        Self {
            rag_chain: Arc::new(rag_chain),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
