//! Session middleware configuration.
//!
//! Production uses the `PostgreSQL` store from `tower-sessions-sqlx-store`;
//! tests plug in `tower_sessions::MemoryStore`.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "nexus_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
///
/// The cookie is HTTP-only, `SameSite=Lax`, and `Secure` whenever the public
/// base URL is HTTPS.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &ServerConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
