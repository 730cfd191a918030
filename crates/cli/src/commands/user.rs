//! Account management commands.
//!
//! Applies the same validation and hashing as `POST /api/register`.

use secrecy::SecretString;
use thiserror::Error;

use nexus_server::db::{self, PgUserStore};
use nexus_server::models::Registration;
use nexus_server::services::{AuthError, AuthService};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Could not connect.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration was rejected.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new account and return its ID.
pub async fn create(database_url: &SecretString, form: Registration) -> Result<i32, UserError> {
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(database_url).await?;

    let store = PgUserStore::new(pool);
    let user = AuthService::new(&store).register(form).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Account created");
    Ok(user.id.as_i32())
}
