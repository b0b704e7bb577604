mod config;
mod db;
mod errors;
mod identity;
mod ingest;
mod matching;
mod models;
mod reporting;
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
use crate::matching::EvaluationEngine;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{seed::seed_demo_data, InMemoryRepository, PgRepository, Repository};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InnoHire API v{}", env!("CARGO_PKG_VERSION"));

    let repo: Arc<dyn Repository> = match &config.database_url {
        Some(url) => Arc::new(PgRepository::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using the in-memory repository (data is lost on exit)");
            Arc::new(InMemoryRepository::new())
        }
    };

    if config.seed_demo_data {
        seed_demo_data(repo.as_ref()).await?;
    }

    let engine = EvaluationEngine::from_config(&config)?;

    let state = AppState::new(repo, engine, config.clone());
    let shutdown = state.shutdown.clone();

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested; cancelling in-flight batch evaluations");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
