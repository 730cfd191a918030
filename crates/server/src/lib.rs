//! Nexus server library.
//!
//! Session-authenticated JSON API for accounts and the team directory, plus a
//! WebSocket connectivity channel. The binary in `main.rs` wires this router to
//! `PostgreSQL`; tests drive the same router over in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, http::Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// `store` backs the session layer: `PostgresStore` in production,
/// `MemoryStore` in tests.
pub fn build_router<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(store, state.config());
    let cors = cors_layer(state.config());

    routes::routes()
        .layer(session_layer)
        .layer(cors)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// CORS for the browser client.
///
/// A configured origin gets credentialed requests (the session cookie);
/// without one any origin is allowed, but without credentials.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin.clone()))
            .allow_methods(methods)
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any),
    }
}
