//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error response has a JSON body of the form `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::team::TeamError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Team directory operation failed.
    #[error("Team error: {0}")]
    Team(#[from] TeamError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Whether this error is the server's fault.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
                | Self::Team(TeamError::Repository(_))
        )
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Team(TeamError::NotFound) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn client_message(&self) -> String {
        // Don't expose internal error details to clients
        if self.is_server_error() {
            return "Internal server error".to_owned();
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_owned(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::InvalidEmail(e) => format!("Invalid email address: {e}"),
                AuthError::InvalidPhone(e) => format!("Invalid phone number: {e}"),
                AuthError::Validation(msg) | AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidToken => "Recovery link is invalid or has expired".to_owned(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_owned()
                }
            },
            Self::Team(err) => err.to_string(),
            Self::Unauthorized(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "message": self.client_message() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
