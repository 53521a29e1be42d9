//! # Souk Admin API Server
//!
//! HTTP/JSON server for the catalog admin backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Admin API Server                                 │
//! │                                                                         │
//! │  Admin UI ───► HTTP (8080) ───► Handlers ───► Document store (SQLite) │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                               Blob store (/files)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use souk_admin_api::config::ApiConfig;
use souk_admin_api::{routes, AppState};
use souk_db::{BlobConfig, BlobStore, Database, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Souk Admin API server...");

    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        database = %config.database_path,
        storage = %config.storage_root.display(),
        "Configuration loaded"
    );

    let db = Database::new(StoreConfig::new(&config.database_path)).await?;
    info!("Document store ready");

    let blobs = BlobStore::new(BlobConfig::new(
        config.storage_root.clone(),
        config.public_url_base.clone(),
    ));
    blobs.ensure_bucket().await?;
    info!("Blob bucket ready");

    let state = Arc::new(AppState {
        db: db.clone(),
        blobs,
        config: config.clone(),
    });

    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    // SIGINT only; the process manager sends it on stop.
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(?e, "Failed to install shutdown signal handler");
    }
}
