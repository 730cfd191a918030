//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only; capture errors and transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//! 5. Session layer (tower-sessions)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_user, set_current_user};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
