//! DocuMentor server binary
//!
//! Run with: cargo run -p documentor --bin documentor-server

use documentor::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "documentor=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing GOOGLE_API_KEY stops startup here
    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.gemini.embedding_model);
    tracing::info!(
        "  - Chat model: {} (temperature {})",
        config.gemini.chat_model,
        config.gemini.temperature
    );
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top K: {}", config.retrieval.top_k);
    tracing::info!("  - Allowed origins: {}", config.server.allowed_origins.join(", "));

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload/    - Upload a PDF (multipart field 'file')");
    println!("  POST /query/     - Ask a question (form fields file_key, question)");
    println!("  GET  /documents/ - List loaded documents");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
