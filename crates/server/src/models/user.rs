//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexus_core::{Email, Phone, UserId};

/// A registered account (domain type).
///
/// Carries no password hash; see [`UserStore::get_password_hash`].
///
/// [`UserStore::get_password_hash`]: crate::db::UserStore::get_password_hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// First name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Login email, unique and lowercased.
    pub email: Email,
    /// Phone number as bare digits.
    pub phone: Phone,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A validated account ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: Email,
    pub phone: Phone,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Registration form as submitted by the client.
#[derive(Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}
