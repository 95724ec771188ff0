#![forbid(unsafe_code)]

use anyhow::Context;
use bubbles_server::render::GraphvizRenderer;
use bubbles_server::{AppState, Config, router};
use bubbles_storage::SqliteStore;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = SqliteStore::open(&config.storage_dir)
        .with_context(|| format!("failed to open store in {:?}", config.storage_dir))?;
    info!(db = %store.db_path().display(), "store ready");

    let renderer = GraphvizRenderer::new(config.dot_bin.clone());
    info!(bin = renderer.bin(), "graphviz renderer configured");

    let app = router(AppState::new(store, Arc::new(renderer)));
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind HTTP on {}", config.listen))?;
    info!(addr = %config.listen, "starting server on http://{}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
