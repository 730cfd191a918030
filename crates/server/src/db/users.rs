//! User repository for database operations.
//!
//! Covers accounts, their password hashes, and password reset tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nexus_core::{Email, Phone, ResetTokenId, UserId};

use super::{RepositoryError, conflict_or_database};
use crate::models::user::{NewUser, User};

/// Storage for user accounts and password reset tokens.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Get a user by their ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user by their (normalized) email.
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Get a user together with their password hash, for credential checks.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Persist the hash of a freshly issued reset token.
    async fn create_reset_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<ResetTokenId, RepositoryError>;

    /// Consume a reset token and replace the owner's password hash.
    ///
    /// The token must be unused and unexpired at `now`. Both writes happen
    /// atomically; returns the owner's ID, or `None` if the token was not
    /// redeemable.
    async fn reset_password(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    surname: String,
    email: String,
    phone: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone = Phone::parse(&r.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(r.id),
            name: r.name,
            surname: r.surname,
            email,
            phone,
            created_at: r.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, surname, email, phone, created_at";

/// `PostgreSQL`-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            r"
            INSERT INTO users (name, surname, email, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email"))?;

        row.try_into()
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserWithHashRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.user.try_into()?, r.password_hash))),
            None => Ok(None),
        }
    }

    async fn create_reset_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<ResetTokenId, RepositoryError> {
        let id: ResetTokenId = sqlx::query_scalar(
            r"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "reset token"))?;

        Ok(id)
    }

    async fn reset_password(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Claiming the row with `used_at IS NULL` in the WHERE clause makes a
        // concurrent second redemption update zero rows.
        let user_id: Option<UserId> = sqlx::query_scalar(
            r"
            UPDATE password_reset_tokens
            SET used_at = $2
            WHERE token_hash = $1 AND used_at IS NULL AND expires_at > $2
            RETURNING user_id
            ",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(user_id))
    }
}
