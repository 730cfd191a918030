//! Team directory service.

use thiserror::Error;

use nexus_core::{Email, TeamMemberId};

use crate::db::{RepositoryError, TeamStore};
use crate::models::team::{
    NewTeamMember, TeamMember, TeamMemberChanges, TeamMemberInput, TeamMemberPatch,
};

/// Errors that can occur during team operations.
#[derive(Debug, Error)]
pub enum TeamError {
    /// Malformed or missing field.
    #[error("{0}")]
    Validation(String),

    /// No active member with the given ID.
    #[error("team member not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Team directory service.
pub struct TeamService<'a> {
    members: &'a dyn TeamStore,
}

impl<'a> TeamService<'a> {
    #[must_use]
    pub const fn new(members: &'a dyn TeamStore) -> Self {
        Self { members }
    }

    /// List active members, newest first.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::Repository` if the database operation fails.
    pub async fn list(&self) -> Result<Vec<TeamMember>, TeamError> {
        Ok(self.members.list_active().await?)
    }

    /// Get an active member.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::NotFound` if the member doesn't exist or was deleted.
    pub async fn get(&self, id: TeamMemberId) -> Result<TeamMember, TeamError> {
        self.members
            .get_active(id)
            .await?
            .ok_or(TeamError::NotFound)
    }

    /// Add a member to the directory.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::Validation` if a field is blank or the email is invalid.
    pub async fn create(&self, input: TeamMemberInput) -> Result<TeamMember, TeamError> {
        let member = NewTeamMember {
            name: required("name", &input.name)?,
            email: email(&input.email)?,
            role: required("role", &input.role)?,
            department: required("department", &input.department)?,
            avatar_url: input.avatar_url.as_deref().and_then(avatar),
        };

        let created = self.members.create(member).await?;
        tracing::info!(member_id = %created.id, "team member created");

        Ok(created)
    }

    /// Apply a partial update. Only supplied fields are validated.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::Validation` if the patch is empty or a supplied field is invalid.
    /// Returns `TeamError::NotFound` if the member doesn't exist or was deleted.
    pub async fn update(
        &self,
        id: TeamMemberId,
        patch: TeamMemberPatch,
    ) -> Result<TeamMember, TeamError> {
        if patch.is_empty() {
            return Err(TeamError::Validation("no fields to update".to_owned()));
        }

        let changes = TeamMemberChanges {
            name: patch.name.map(|v| required("name", &v)).transpose()?,
            email: patch.email.map(|v| email(&v)).transpose()?,
            role: patch.role.map(|v| required("role", &v)).transpose()?,
            department: patch
                .department
                .map(|v| required("department", &v))
                .transpose()?,
            avatar_url: patch
                .avatar_url
                .map(|v| v.as_deref().and_then(avatar)),
        };

        let updated = self
            .members
            .update(id, changes)
            .await?
            .ok_or(TeamError::NotFound)?;
        tracing::info!(member_id = %id, "team member updated");

        Ok(updated)
    }

    /// Soft-delete a member.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::NotFound` if the member doesn't exist or was already deleted.
    pub async fn soft_delete(&self, id: TeamMemberId) -> Result<(), TeamError> {
        if !self.members.soft_delete(id).await? {
            return Err(TeamError::NotFound);
        }
        tracing::info!(member_id = %id, "team member deleted");

        Ok(())
    }
}

fn required(field: &str, value: &str) -> Result<String, TeamError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TeamError::Validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn email(value: &str) -> Result<Email, TeamError> {
    Email::parse(value).map_err(|e| TeamError::Validation(format!("invalid email: {e}")))
}

/// Empty avatar input means "no avatar".
fn avatar(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::InMemoryTeamStore;

    fn input(name: &str) -> TeamMemberInput {
        TeamMemberInput {
            name: name.to_owned(),
            email: "Member@Example.com".to_owned(),
            role: "Designer".to_owned(),
            department: "Product".to_owned(),
            avatar_url: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_fields() {
        let store = InMemoryTeamStore::new();
        let team = TeamService::new(&store);

        let member = team.create(input(" Rita ")).await.unwrap();
        assert_eq!(member.name, "Rita");
        assert_eq!(member.email.as_str(), "member@example.com");
        assert_eq!(member.avatar_url, None);
        assert!(!member.deleted);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let store = InMemoryTeamStore::new();
        let team = TeamService::new(&store);

        let mut bad = input("Rita");
        bad.role = "  ".to_owned();
        assert!(matches!(team.create(bad).await, Err(TeamError::Validation(_))));

        let mut bad = input("Rita");
        bad.email = "rita".to_owned();
        assert!(matches!(team.create(bad).await, Err(TeamError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let store = InMemoryTeamStore::new();
        let team = TeamService::new(&store);
        let member = team.create(input("Rita")).await.unwrap();

        let patch = TeamMemberPatch {
            role: Some("Lead Designer".to_owned()),
            avatar_url: Some(Some("https://cdn.example.com/rita.png".to_owned())),
            ..TeamMemberPatch::default()
        };
        let updated = team.update(member.id, patch).await.unwrap();
        assert_eq!(updated.name, "Rita");
        assert_eq!(updated.role, "Lead Designer");
        assert_eq!(
            updated.avatar_url.as_deref(),
            Some("https://cdn.example.com/rita.png")
        );

        let clear = TeamMemberPatch {
            avatar_url: Some(Some(String::new())),
            ..TeamMemberPatch::default()
        };
        assert_eq!(team.update(member.id, clear).await.unwrap().avatar_url, None);

        let restore = TeamMemberPatch {
            avatar_url: Some(Some("https://cdn.example.com/rita.png".to_owned())),
            ..TeamMemberPatch::default()
        };
        team.update(member.id, restore).await.unwrap();
        let null = TeamMemberPatch {
            avatar_url: Some(None),
            ..TeamMemberPatch::default()
        };
        let cleared = team.update(member.id, null).await.unwrap();
        assert_eq!(cleared.avatar_url, None);
        assert_eq!(cleared.role, "Lead Designer");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_and_invalid_patches() {
        let store = InMemoryTeamStore::new();
        let team = TeamService::new(&store);
        let member = team.create(input("Rita")).await.unwrap();

        assert!(matches!(
            team.update(member.id, TeamMemberPatch::default()).await,
            Err(TeamError::Validation(_))
        ));

        let blank_name = TeamMemberPatch {
            name: Some(String::new()),
            ..TeamMemberPatch::default()
        };
        assert!(matches!(
            team.update(member.id, blank_name).await,
            Err(TeamError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_member() {
        let store = InMemoryTeamStore::new();
        let team = TeamService::new(&store);

        let patch = TeamMemberPatch {
            name: Some("Ghost".to_owned()),
            ..TeamMemberPatch::default()
        };
        assert!(matches!(
            team.update(TeamMemberId::new(99), patch).await,
            Err(TeamError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_member() {
        let store = InMemoryTeamStore::new();
        let team = TeamService::new(&store);
        let member = team.create(input("Rita")).await.unwrap();
        team.create(input("Caio")).await.unwrap();

        team.soft_delete(member.id).await.unwrap();

        let listed = team.list().await.unwrap();
        assert!(listed.iter().all(|m| m.id != member.id));
        assert_eq!(listed.len(), 1);
        assert!(matches!(team.get(member.id).await, Err(TeamError::NotFound)));
        assert!(matches!(
            team.soft_delete(member.id).await,
            Err(TeamError::NotFound)
        ));
    }
}
