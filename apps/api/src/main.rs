mod analysis;
mod config;
mod db;
mod errors;
mod export;
mod extract;
mod llm_client;
mod models;
mod records;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::AnalysisPipeline;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{EmbeddingClient, GroqClient, HuggingFaceClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize model-service clients
    if config.hf_token.is_none() {
        warn!("HUGGINGFACEHUB_API_TOKEN is not set; similarity requests will fail");
    }
    if config.groq_api_key.is_none() {
        warn!("GROQ_API_KEY is not set; rewrite requests will fail");
    }
    let embeddings = EmbeddingClient::new(
        config.hf_api_url.clone(),
        config.hf_token.clone(),
        config.embedding_model.clone(),
    )?;
    let suggestions = HuggingFaceClient::new(config.hf_api_url.clone(), config.hf_token.clone())?;
    let rewriter = GroqClient::new(config.groq_api_url.clone(), config.groq_api_key.clone())?;
    info!(
        "Model clients initialized (embeddings: {}, rewrite: {})",
        config.embedding_model,
        llm_client::groq::MODEL
    );

    let pipeline = AnalysisPipeline::new(
        Arc::new(embeddings),
        Arc::new(suggestions),
        Arc::new(rewriter),
    )
    .with_policy(config.scoring_policy());

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        pipeline,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
