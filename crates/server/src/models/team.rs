//! Team directory types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use nexus_core::{Email, TeamMemberId};

/// A member of the team directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub email: Email,
    pub role: String,
    pub department: String,
    pub avatar_url: Option<String>,
    /// Always `false` for members returned by the API.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/team`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberInput {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Body of `PATCH /api/team/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    /// `null` or an empty string clears the avatar.
    #[serde(default, deserialize_with = "present")]
    pub avatar_url: Option<Option<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TeamMemberPatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.department.is_none()
            && self.avatar_url.is_none()
    }
}

/// A validated team member ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub name: String,
    pub email: Email,
    pub role: String,
    pub department: String,
    pub avatar_url: Option<String>,
}

/// Validated partial update.
///
/// `avatar_url` is doubly optional: `None` leaves the column alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TeamMemberChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub avatar_url: Option<Option<String>>,
}

impl TeamMemberChanges {
    /// Apply the changes to an in-memory member.
    pub fn apply_to(self, member: &mut TeamMember) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(role) = self.role {
            member.role = role;
        }
        if let Some(department) = self.department {
            member.department = department;
        }
        if let Some(avatar_url) = self.avatar_url {
            member.avatar_url = avatar_url;
        }
    }
}
