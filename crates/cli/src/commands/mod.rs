//! CLI subcommands.

pub mod migrate;
pub mod user;

use secrecy::SecretString;
use thiserror::Error;

/// The database URL could not be determined.
#[derive(Debug, Error)]
#[error("Missing environment variable: NEXUS_DATABASE_URL (or DATABASE_URL)")]
pub struct MissingDatabaseUrl;

/// Resolve the database URL: `--database-url`/`NEXUS_DATABASE_URL`, then `DATABASE_URL`.
pub fn database_url(explicit: Option<String>) -> Result<SecretString, MissingDatabaseUrl> {
    explicit
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
        .ok_or(MissingDatabaseUrl)
}
