//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, password login, password recovery
//! - `team` - Team directory CRUD with soft delete
//! - `notifier` - Connectivity broadcast for `/socket.io` clients

pub mod auth;
pub mod notifier;
pub mod team;

pub use auth::{AuthError, AuthService, RecoveryToken};
pub use notifier::{Notifier, SocketEvent, SocketEventKind};
pub use team::{TeamError, TeamService};
