//! SquadLink Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use squadlink_engine::api;
use squadlink_engine::infrastructure::{
    config::{load_dotenv_from_repo_root, EngineConfig},
    ollama::OllamaClient,
};
use squadlink_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squadlink_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SquadLink Engine");

    let config = EngineConfig::from_env();

    let llm = Arc::new(OllamaClient::with_timeout(
        &config.ollama_base_url,
        &config.ollama_model,
        config.timeout_secs,
    ));
    tracing::info!(
        base_url = %config.ollama_base_url,
        model = %config.ollama_model,
        timeout_secs = config.timeout_secs,
        "LLM client configured"
    );

    let addr: SocketAddr = config.listen_addr().parse()?;
    let app = Arc::new(App::new(config, llm));
    let router = api::router(app);

    tracing::info!("Listening on {}", addr);
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  POST /api/command           - Process text command");
    tracing::info!("  POST /api/execute           - Execute a compiled command");
    tracing::info!("  POST /api/reset             - Reset companion state");
    tracing::info!("  GET  /api/companions/{{id}}   - Inspect companion state");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
