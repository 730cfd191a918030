//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] nexus_core::EmailError),

    /// Invalid phone format.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] nexus_core::PhoneError),

    /// A required profile field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Reset token unknown, expired, or already used.
    #[error("invalid or expired reset token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
