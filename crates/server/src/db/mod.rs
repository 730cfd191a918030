//! Database operations for Nexus `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Registered accounts (Argon2 password hashes)
//! - `team_members` - Team directory, soft-deleted via the `deleted` flag
//! - `password_reset_tokens` - Single-use recovery tokens (SHA-256 hashed)
//! - `tower_sessions.session` - Session storage, owned by `tower-sessions-sqlx-store`
//!
//! # Storage traits
//!
//! Handlers never talk to `sqlx` directly. They go through [`UserStore`] and
//! [`TeamStore`], which have a `PostgreSQL` implementation for production and
//! an in-memory implementation in [`memory`] for tests and local experiments.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p nexus-cli -- migrate
//! ```

pub mod memory;
pub mod team;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

pub use memory::{InMemoryTeamStore, InMemoryUserStore};
pub use team::{PgTeamStore, TeamStore};
pub use users::{PgUserStore, UserStore};

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Schema migration failed.
    #[error("schema migration failed: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),

    /// Session store migration failed.
    #[error("session store migration failed: {0}")]
    SessionStore(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded schema migrations, then create the session table.
///
/// # Errors
///
/// Returns `MigrationError` if either step fails.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrationError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    PostgresStore::new(pool.clone()).migrate().await?;
    Ok(())
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
