//! Authentication route handlers.
//!
//! Registration, login/logout, the current-user probe, and password recovery.
//! All bodies are JSON.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, Registration, User};
use crate::state::AppState;

/// Login request. The web client posts the email under `username`.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

/// Password recovery request.
#[derive(Debug, Deserialize)]
pub struct RecoveryRequest {
    pub email: String,
}

/// Password reset request, carrying the token from the recovery link.
#[derive(Deserialize)]
pub struct ResetRequest {
    pub token: String,
    pub password: String,
}

/// Response to every well-formed recovery request.
const RECOVERY_ACCEPTED: &str = "If an account exists for that email, a recovery link has been sent";

/// Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<Registration>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.auth().register(form).await?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = state
        .auth()
        .login(&request.email, &request.password)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "login failed"))?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(user))
}

/// Destroy the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Return the logged-in user's profile.
pub async fn current_user(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = load_user(&state, &current).await?;
    Ok(Json(user))
}

/// Start password recovery.
///
/// Responds identically whether or not the email is registered. The link is
/// delivered through the log until an email transport exists.
pub async fn request_recovery(
    State(state): State<AppState>,
    Json(request): Json<RecoveryRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if let Some(recovery) = state.auth().request_recovery(&request.email).await? {
        let link = state
            .config()
            .recovery_link(recovery.token.expose_secret());
        tracing::info!(
            user_id = %recovery.user.id,
            expires_at = %recovery.expires_at,
            %link,
            "password recovery link issued"
        );
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": RECOVERY_ACCEPTED })),
    ))
}

/// Finish password recovery with the emailed token.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<StatusCode> {
    let token = SecretString::from(request.token);
    state
        .auth()
        .reset_password(&token, &request.password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reload the full profile for a session user.
///
/// A session whose user no longer exists is treated as logged out.
pub(crate) async fn load_user(state: &AppState, current: &CurrentUser) -> Result<User> {
    state
        .auth()
        .get_user(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_owned()))
}
