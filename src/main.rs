use tracing_subscriber::EnvFilter;

use codebase_qa::api;
use codebase_qa::config::Config;
use codebase_qa::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    match &config.provider {
        Some(provider) => tracing::info!(
            "Provider: {} (embeddings: {}, chat: {})",
            provider.base_url,
            provider.embedding_model,
            provider.chat_model
        ),
        None => tracing::info!("No OPENAI_API_KEY set, using local keyword mode"),
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
