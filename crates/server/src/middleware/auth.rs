//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user in route handlers, and
//! helpers to establish and destroy the login on the session.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, keys};

/// Extractor that requires an authenticated user.
///
/// Rejects with `401 Unauthorized` when the session carries no user, and with
/// `500` when the session store cannot be read.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unauthenticated = || AppError::Unauthorized("Not authenticated".to_owned());

        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(unauthenticated)?;
        let user = session.get::<CurrentUser>(keys::CURRENT_USER).await?;

        user.map(Self).ok_or_else(unauthenticated)
    }
}

/// Log `user` in on this session.
///
/// The session ID is rotated first so an ID planted before login is useless
/// afterwards.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER, user).await
}

/// Log out: delete the session record and expire the cookie.
///
/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
