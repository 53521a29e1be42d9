//! # Database Migrations
//!
//! Embedded SQL migrations for the document store.
//!
//! ## Adding New Migrations
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. Write idempotent SQL (`IF NOT EXISTS` where possible)
//! 4. NEVER modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// Migrations embedded from `migrations/sqlite` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations in order.
///
/// Applied migrations are tracked in `_sqlx_migrations`; running twice is
/// safe.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    let applied_before = MIGRATOR.migrations.len();
    MIGRATOR.run(pool).await?;
    info!(migrations = applied_before, "Migrations up to date");
    Ok(())
}
