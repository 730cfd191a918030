//! Database migration command.
//!
//! Applies the embedded schema migrations from `crates/server/migrations/`,
//! then creates the `tower_sessions` schema used by the session store.
//!
//! ```bash
//! nexus-cli migrate
//! ```

use secrecy::SecretString;
use thiserror::Error;

use nexus_server::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Could not connect.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// A migration step failed.
    #[error(transparent)]
    Migration(#[from] db::MigrationError),
}

/// Run all migrations.
pub async fn run(database_url: &SecretString) -> Result<(), MigrateError> {
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(database_url).await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
