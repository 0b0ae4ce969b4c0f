//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::StoreError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a blocking connection.
///
/// Call from `tokio::task::spawn_blocking`; Diesel's migration harness is
/// synchronous.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] when the database cannot be reached
/// and [`StoreError::Query`] when a migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<(), StoreError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| StoreError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| StoreError::query(err.to_string()))?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
