//! # Category Tree Migration
//!
//! Standalone one-shot rebuild of the denormalized `children` /
//! `subchildren` caches, mirroring the HTTP migration endpoint.
//!
//! ## Usage
//! ```bash
//! # Uses DATABASE_PATH from the environment or a local .env file
//! cargo run -p souk-db --bin souk-migrate
//!
//! # Explicit database path
//! DATABASE_PATH=./data/souk.db cargo run -p souk-db --bin souk-migrate
//! ```
//!
//! Safe to run repeatedly: the rebuild is idempotent.

use std::env;

use souk_db::{Database, StoreConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Own environment bootstrap: this binary runs outside the server.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/souk.db".to_string());
    info!(path = %database_path, "Opening document store");

    let db = Database::new(StoreConfig::new(&database_path)).await?;

    let written = db.catalog().rebuild_tree().await?;
    info!(main_categories = written, "Tree migration complete");

    db.close().await;
    Ok(())
}
