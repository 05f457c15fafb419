use std::path::Path;

use product_recommender::{
    api::{create_router, AppState},
    bootstrap,
    config::Config,
    services::DataIngestor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let log_path = product_recommender::logging::init_tracing(Path::new(&config.log_dir))?;
    tracing::info!(log_file = %log_path.display(), "Logging initialized");

    config.validate()?;

    // Serve whatever a previous `ingest` run stored; startup never re-embeds the CSV.
    let store = bootstrap::build_vector_store(&config)?;
    let store = DataIngestor::new(store, &config.csv_path, config.ingest_batch_size)
        .ingest(true)
        .await?;

    let rag_chain = bootstrap::build_rag_chain(&config, store)?;
    let app = create_router(AppState::new(rag_chain));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
