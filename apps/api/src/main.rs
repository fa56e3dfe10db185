mod config;
mod cv;
mod db;
mod errors;
mod llm_client;
mod models;
mod ranking;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{CandidateStore, MemoryCandidateStore, PgCandidateStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting talentrank API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let store: Arc<dyn CandidateStore> = match &config.database_url {
        Some(url) => Arc::new(PgCandidateStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; CVs and jobs are kept in memory only");
            Arc::new(MemoryCandidateStore::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store: store.clone(),
        llm: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
