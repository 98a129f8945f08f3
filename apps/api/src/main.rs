mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod normalize;
mod render;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{close_pool, create_lazy_pool};
use crate::extraction::Extractor;
use crate::llm_client::LlmClient;
use crate::render::fonts::FontSet;
use crate::render::Renderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryRecordStore, PgRecordStore, RecordStore};

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

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Record store: Postgres when configured, process memory otherwise
    let pool = config
        .database_url
        .as_deref()
        .map(create_lazy_pool)
        .transpose()?;
    let store: Arc<dyn RecordStore> = match &pool {
        Some(pool) => Arc::new(PgRecordStore::new(pool.clone())),
        None => {
            warn!("DATABASE_URL is not set; records are kept in memory and lost on restart");
            Arc::new(InMemoryRecordStore::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Fonts are resolved once; a missing typeface only downgrades to Helvetica
    let renderer = Renderer::new(FontSet::resolve(config.font_dir.as_deref()));
    info!(
        regular = renderer.fonts().regular.base_font(),
        bold = renderer.fonts().bold.base_font(),
        "Renderer ready"
    );

    let state = AppState {
        extractor: Extractor::new(config.staging_dir.clone()),
        llm: Arc::new(llm),
        store,
        renderer,
    };

    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = &pool {
        close_pool(pool).await;
    }
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
