//! Shared harness for router-level tests.
//!
//! Drives the real `Router` (all middleware included) over in-memory stores
//! and a `MemoryStore` session backend, carrying the session cookie between
//! requests like a browser would.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use nexus_server::build_router;
use nexus_server::config::ServerConfig;
use nexus_server::middleware::session::SESSION_COOKIE_NAME;
use nexus_server::state::AppState;

pub struct TestApp {
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
}

/// Configuration with only the required database URL set. Nothing connects to it.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|key| match key {
        "NEXUS_DATABASE_URL" => Some("postgres://unused/nexus_test".to_owned()),
        _ => None,
    })
    .expect("test config should load")
}

/// The full application router over in-memory storage.
pub fn test_router() -> Router {
    build_router(AppState::in_memory(test_config()), MemoryStore::default())
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(test_config());
        let router = build_router(state.clone(), MemoryStore::default());

        Self {
            state,
            router,
            cookie: None,
        }
    }

    /// Whether a session cookie is currently held.
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// The `name=value` pair of the held session cookie.
    pub fn session_cookie(&self) -> Option<String> {
        self.cookie.clone()
    }

    /// Put back a previously captured cookie.
    pub fn restore_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }

    /// Forget the session cookie, as a fresh browser would.
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        self.remember_cookie(&response);

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    fn remember_cookie(&mut self, response: &axum::response::Response) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            let Some((name, token)) = pair.split_once('=') else { continue };
            if name.trim() != SESSION_COOKIE_NAME {
                continue;
            }

            let expired = token.is_empty() || value.to_ascii_lowercase().contains("max-age=0");
            self.cookie = if expired {
                None
            } else {
                Some(pair.trim().to_owned())
            };
        }
    }

    /// Register an account (which also logs it in) and return the user JSON.
    pub async fn register(&mut self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/register",
                json!({
                    "name": "Ana",
                    "surname": "Souza",
                    "email": email,
                    "phone": "+55 (11) 98765-4321",
                    "password": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }

    pub async fn login(&mut self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/login",
            json!({ "username": email, "password": password }),
        )
        .await
    }
}
