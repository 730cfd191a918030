//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (database ping)
//! GET    /socket.io            - Connectivity WebSocket
//!
//! # Auth
//! POST   /api/register         - Create account and log in
//! POST   /api/login            - Log in
//! POST   /api/logout           - Log out
//! GET    /api/user             - Current user (requires auth)
//! POST   /api/recovery         - Request a password recovery link
//! POST   /api/recovery/reset   - Set a new password with a recovery token
//!
//! # Dashboard (requires auth)
//! GET    /api/dashboard        - Welcome payload
//!
//! # Team (requires auth)
//! GET    /api/team             - List members
//! POST   /api/team             - Create member
//! GET    /api/team/{id}        - Get member
//! PATCH  /api/team/{id}        - Update member
//! DELETE /api/team/{id}        - Soft-delete member
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod socket;
pub mod team;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
        .route("/recovery", post(auth::request_recovery))
        .route("/recovery/reset", post(auth::reset_password))
}

/// Create the team routes router.
pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(team::index).post(team::create))
        .route(
            "/{id}",
            get(team::show).patch(team::update).delete(team::delete),
        )
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/socket.io", get(socket::upgrade))
        .nest(
            "/api",
            auth_routes()
                .route("/dashboard", get(dashboard::index))
                .nest("/team", team_routes()),
        )
}
