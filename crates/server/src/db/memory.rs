//! In-memory storage backends.
//!
//! Same semantics as the `PostgreSQL` stores (unique emails, soft delete,
//! single-use reset tokens) without a database. Used by the test suites.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nexus_core::{Email, ResetTokenId, TeamMemberId, UserId};

use super::{RepositoryError, TeamStore, UserStore};
use crate::models::team::{NewTeamMember, TeamMember, TeamMemberChanges};
use crate::models::user::{NewUser, User};

fn poisoned() -> RepositoryError {
    RepositoryError::DataCorruption("in-memory store lock poisoned".to_owned())
}

struct StoredUser {
    user: User,
    password_hash: String,
}

struct StoredToken {
    user_id: UserId,
    token_hash: String,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct UserTables {
    users: Vec<StoredUser>,
    tokens: Vec<StoredToken>,
}

/// In-memory [`UserStore`].
#[derive(Default)]
pub struct InMemoryUserStore {
    tables: RwLock<UserTables>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;

        if tables.users.iter().any(|u| u.user.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = i32::try_from(tables.users.len() + 1)
            .map_err(|_| RepositoryError::DataCorruption("user id overflow".to_owned()))?;
        let created = User {
            id: UserId::new(id),
            name: user.name,
            surname: user.surname,
            email: user.email,
            phone: user.phone,
            created_at: Utc::now(),
        };
        tables.users.push(StoredUser {
            user: created.clone(),
            password_hash: user.password_hash,
        });

        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .users
            .iter()
            .find(|u| &u.user.email == email)
            .map(|u| u.user.clone()))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .users
            .iter()
            .find(|u| &u.user.email == email)
            .map(|u| (u.user.clone(), u.password_hash.clone())))
    }

    async fn create_reset_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<ResetTokenId, RepositoryError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;

        if tables.tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(RepositoryError::Conflict(
                "reset token already exists".to_owned(),
            ));
        }

        tables.tokens.push(StoredToken {
            user_id,
            token_hash: token_hash.to_owned(),
            expires_at,
            used_at: None,
        });
        let id = i32::try_from(tables.tokens.len())
            .map_err(|_| RepositoryError::DataCorruption("token id overflow".to_owned()))?;

        Ok(ResetTokenId::new(id))
    }

    async fn reset_password(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, RepositoryError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;

        let Some(token) = tables
            .tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && t.used_at.is_none() && t.expires_at > now)
        else {
            return Ok(None);
        };
        token.used_at = Some(now);
        let user_id = token.user_id;

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.user.id == user_id)
            .ok_or(RepositoryError::NotFound)?;
        password_hash.clone_into(&mut user.password_hash);

        Ok(Some(user_id))
    }
}

/// In-memory [`TeamStore`].
#[derive(Default)]
pub struct InMemoryTeamStore {
    members: RwLock<HashMap<TeamMemberId, TeamMember>>,
}

impl InMemoryTeamStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn list_active(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let members = self.members.read().map_err(|_| poisoned())?;
        let mut active: Vec<TeamMember> = members.values().filter(|m| !m.deleted).cloned().collect();
        active.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_i32().cmp(&a.id.as_i32()))
        });
        Ok(active)
    }

    async fn get_active(&self, id: TeamMemberId) -> Result<Option<TeamMember>, RepositoryError> {
        let members = self.members.read().map_err(|_| poisoned())?;
        Ok(members.get(&id).filter(|m| !m.deleted).cloned())
    }

    async fn create(&self, member: NewTeamMember) -> Result<TeamMember, RepositoryError> {
        let mut members = self.members.write().map_err(|_| poisoned())?;

        let id = i32::try_from(members.len() + 1)
            .map_err(|_| RepositoryError::DataCorruption("team member id overflow".to_owned()))?;
        let created = TeamMember {
            id: TeamMemberId::new(id),
            name: member.name,
            email: member.email,
            role: member.role,
            department: member.department,
            avatar_url: member.avatar_url,
            deleted: false,
            created_at: Utc::now(),
        };
        members.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(
        &self,
        id: TeamMemberId,
        changes: TeamMemberChanges,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let mut members = self.members.write().map_err(|_| poisoned())?;

        match members.get_mut(&id).filter(|m| !m.deleted) {
            Some(member) => {
                changes.apply_to(member);
                Ok(Some(member.clone()))
            }
            None => Ok(None),
        }
    }

    async fn soft_delete(&self, id: TeamMemberId) -> Result<bool, RepositoryError> {
        let mut members = self.members.write().map_err(|_| poisoned())?;

        match members.get_mut(&id).filter(|m| !m.deleted) {
            Some(member) => {
                member.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
