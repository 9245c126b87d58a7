//! Embedded PostgreSQL schema (`alumni_core/migrations/`).

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Bring the schema up to date. Already-applied migrations are skipped.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(latest, "database schema up to date");
    Ok(())
}
