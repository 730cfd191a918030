//! Team member repository for database operations.
//!
//! Members are never removed: `soft_delete` sets the `deleted` flag and every
//! read filters on `NOT deleted`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nexus_core::{Email, TeamMemberId};

use super::RepositoryError;
use crate::models::team::{NewTeamMember, TeamMember, TeamMemberChanges};

/// Storage for the team directory.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// List active members, newest first.
    async fn list_active(&self) -> Result<Vec<TeamMember>, RepositoryError>;

    /// Get an active member by ID.
    async fn get_active(&self, id: TeamMemberId) -> Result<Option<TeamMember>, RepositoryError>;

    /// Insert a new member.
    async fn create(&self, member: NewTeamMember) -> Result<TeamMember, RepositoryError>;

    /// Apply changes to an active member. `None` if no active member has `id`.
    async fn update(
        &self,
        id: TeamMemberId,
        changes: TeamMemberChanges,
    ) -> Result<Option<TeamMember>, RepositoryError>;

    /// Mark an active member as deleted. `false` if no active member has `id`.
    async fn soft_delete(&self, id: TeamMemberId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    id: i32,
    name: String,
    email: String,
    role: String,
    department: String,
    avatar_url: Option<String>,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TeamMemberRow> for TeamMember {
    type Error = RepositoryError;

    fn try_from(r: TeamMemberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: TeamMemberId::new(r.id),
            name: r.name,
            email,
            role: r.role,
            department: r.department,
            avatar_url: r.avatar_url,
            deleted: r.deleted,
            created_at: r.created_at,
        })
    }
}

const MEMBER_COLUMNS: &str = "id, name, email, role, department, avatar_url, deleted, created_at";

/// `PostgreSQL`-backed [`TeamStore`].
#[derive(Clone)]
pub struct PgTeamStore {
    pool: PgPool,
}

impl PgTeamStore {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for PgTeamStore {
    async fn list_active(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let rows: Vec<TeamMemberRow> = sqlx::query_as(&format!(
            r"
            SELECT {MEMBER_COLUMNS}
            FROM team_members
            WHERE NOT deleted
            ORDER BY created_at DESC, id DESC
            "
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TeamMember::try_from).collect()
    }

    async fn get_active(&self, id: TeamMemberId) -> Result<Option<TeamMember>, RepositoryError> {
        let row: Option<TeamMemberRow> = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members WHERE id = $1 AND NOT deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeamMember::try_from).transpose()
    }

    async fn create(&self, member: NewTeamMember) -> Result<TeamMember, RepositoryError> {
        let row: TeamMemberRow = sqlx::query_as(&format!(
            r"
            INSERT INTO team_members (name, email, role, department, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEMBER_COLUMNS}
            "
        ))
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.role)
        .bind(&member.department)
        .bind(&member.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update(
        &self,
        id: TeamMemberId,
        changes: TeamMemberChanges,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let (set_avatar, avatar_url) = match changes.avatar_url {
            Some(avatar_url) => (true, avatar_url),
            None => (false, None),
        };

        let row: Option<TeamMemberRow> = sqlx::query_as(&format!(
            r"
            UPDATE team_members
            SET name       = COALESCE($2, name),
                email      = COALESCE($3, email),
                role       = COALESCE($4, role),
                department = COALESCE($5, department),
                avatar_url = CASE WHEN $6 THEN $7 ELSE avatar_url END
            WHERE id = $1 AND NOT deleted
            RETURNING {MEMBER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.role)
        .bind(changes.department)
        .bind(set_avatar)
        .bind(avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeamMember::try_from).transpose()
    }

    async fn soft_delete(&self, id: TeamMemberId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE team_members SET deleted = TRUE WHERE id = $1 AND NOT deleted")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
