//! Dashboard route handler.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::auth::load_user;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Landing data for the logged-in dashboard.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Value>> {
    let user = load_user(&state, &current).await?;

    Ok(Json(json!({
        "message": "Welcome to the dashboard",
        "user": user,
    })))
}
