//! Authentication service.
//!
//! Password registration and login, plus token-based password recovery.
//! Session handling lives in [`crate::middleware::auth`]; this service only
//! deals with accounts and credentials.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use nexus_core::{Email, Phone, UserId};

use crate::db::{RepositoryError, UserStore};
use crate::models::user::{NewUser, Registration, User};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// How long a recovery token stays redeemable.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Random bytes per recovery token.
const RESET_TOKEN_BYTES: usize = 32;

/// Hash verified against when the email is unknown, so both login failure
/// paths cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("nexus-timing-equalizer").ok());

/// A freshly issued password recovery token.
///
/// Only the SHA-256 of `token` is persisted; the plaintext exists solely in
/// this value and in the link handed to the user.
pub struct RecoveryToken {
    /// URL-safe token to embed in the recovery link.
    pub token: SecretString,
    /// Account the token belongs to.
    pub user: User,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Authentication service.
///
/// Handles user registration, login, and password recovery.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the name or surname is blank.
    /// Returns `AuthError::InvalidEmail` / `AuthError::InvalidPhone` for malformed contact data.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, form: Registration) -> Result<User, AuthError> {
        let name = required("name", &form.name)?;
        let surname = required("surname", &form.surname)?;
        let email = Email::parse(&form.email)?;
        let phone = Phone::parse(&form.phone)?;

        validate_password(&form.password)?;
        let password_hash = hash_password(&form.password)?;

        let user = self
            .users
            .create(NewUser {
                name,
                surname,
                email,
                phone,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong,
    /// including when the email is malformed or unknown.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(user_id).await?)
    }

    /// Issue a recovery token if `email` belongs to an account.
    ///
    /// Returns `None` for unknown addresses; callers must respond identically
    /// in both cases.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn request_recovery(&self, email: &str) -> Result<Option<RecoveryToken>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            tracing::debug!("password recovery requested for unknown email");
            return Ok(None);
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.users
            .create_reset_token(user.id, &hash_token(&token), expires_at)
            .await?;

        Ok(Some(RecoveryToken {
            token: SecretString::from(token),
            user,
            expires_at,
        }))
    }

    /// Redeem a recovery token and set a new password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet requirements.
    /// Returns `AuthError::InvalidToken` if the token is unknown, expired, or used.
    pub async fn reset_password(
        &self,
        token: &SecretString,
        new_password: &str,
    ) -> Result<UserId, AuthError> {
        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        let user_id = self
            .users
            .reset_password(&hash_token(token.expose_secret()), &password_hash, Utc::now())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        tracing::info!(user_id = %user_id, "password reset");

        Ok(user_id)
    }
}

/// Trim a required text field, rejecting blank input.
fn required(field: &str, value: &str) -> Result<String, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a URL-safe random recovery token.
fn generate_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex-encoded SHA-256 of a token, as stored in `password_reset_tokens`.
fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
