use std::{path::PathBuf, sync::Arc};

use crate::{
    error::{AppError, AppResult, ResultExt},
    services::{data_converter::DataConverter, providers::VectorStore},
};

/// Loads product reviews into the vector store
pub struct DataIngestor {
    store: Arc<dyn VectorStore>,
    csv_path: PathBuf,
    batch_size: usize,
}

/// Number of batches needed for `total` documents
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(batch_size)
}

impl DataIngestor {
    pub fn new(store: Arc<dyn VectorStore>, csv_path: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            store,
            csv_path: csv_path.into(),
            batch_size: batch_size.max(1),
        }
    }

    /// Returns the vector store, first filling it from the CSV unless
    /// `load_existing` is set.
    ///
    /// The server starts with `load_existing = true` and relies on a previous
    /// ingestion run having populated the collection.
    pub async fn ingest(&self, load_existing: bool) -> AppResult<Arc<dyn VectorStore>> {
        tracing::info!(load_existing, store = self.store.name(), "Starting data ingestion");

        if load_existing {
            tracing::info!("Using existing vector store contents");
            return Ok(self.store.clone());
        }

        if !self.csv_path.exists() {
            return Err(AppError::NotFound(format!(
                "CSV file not found at: {}",
                self.csv_path.display()
            )))
            .context("Data ingestion failed");
        }

        let documents = DataConverter::new(&self.csv_path)
            .convert()
            .context("Failed to convert review CSV")?;

        if documents.is_empty() {
            return Err(AppError::InvalidInput(
                "No documents found in the CSV file".to_string(),
            ))
            .context("Data ingestion failed");
        }

        let total_batches = batch_count(documents.len(), self.batch_size);
        tracing::info!(
            documents = documents.len(),
            batches = total_batches,
            "Adding documents to vector store"
        );

        for (index, batch) in documents.chunks(self.batch_size).enumerate() {
            tracing::info!(
                "Processing batch {}/{} ({} documents)",
                index + 1,
                total_batches,
                batch.len()
            );

            self.store
                .add_documents(batch)
                .await
                .context(format!("Failed to add batch {}/{}", index + 1, total_batches))?;
        }

        tracing::info!(documents = documents.len(), "Successfully added all documents to vector store");

        Ok(self.store.clone())
    }
}
