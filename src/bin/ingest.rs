use std::{path::Path, sync::Arc};

use product_recommender::{
    bootstrap,
    config::Config,
    error::AppResult,
    services::{providers::VectorStore, DataIngestor},
};

/// Embeds the review CSV into the vector store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    product_recommender::logging::init_tracing(Path::new(&config.log_dir))?;

    println!("Starting product recommender data ingestion...");

    let result: AppResult<Arc<dyn VectorStore>> = async {
        config.validate()?;
        let store = bootstrap::build_vector_store(&config)?;
        DataIngestor::new(store, &config.csv_path, config.ingest_batch_size)
            .ingest(false)
            .await
    }
    .await;

    match result {
        Ok(store) => {
            println!("Data ingestion completed successfully (store: {})", store.name());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error during data ingestion: {}", e);
            eprintln!();
            eprintln!("Troubleshooting tips:");
            eprintln!("1. Make sure you have a .env file with valid AstraDB credentials");
            eprintln!("2. Check that {} exists", config.csv_path);
            eprintln!("3. Verify your network connection to the HuggingFace inference API");
            Err(e.into())
        }
    }
}
