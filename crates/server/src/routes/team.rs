//! Team directory route handlers.
//!
//! Every handler requires a logged-in user.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use nexus_core::TeamMemberId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{TeamMember, TeamMemberInput, TeamMemberPatch};
use crate::state::AppState;

/// List active members, newest first.
pub async fn index(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<Json<Vec<TeamMember>>> {
    Ok(Json(state.team().list().await?))
}

/// Get one active member.
pub async fn show(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<TeamMemberId>,
) -> Result<Json<TeamMember>> {
    Ok(Json(state.team().get(id).await?))
}

/// Add a member.
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(input): Json<TeamMemberInput>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    let member = state.team().create(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Partially update a member.
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<TeamMemberId>,
    Json(patch): Json<TeamMemberPatch>,
) -> Result<Json<TeamMember>> {
    Ok(Json(state.team().update(id, patch).await?))
}

/// Soft-delete a member.
pub async fn delete(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<TeamMemberId>,
) -> Result<StatusCode> {
    state.team().soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
