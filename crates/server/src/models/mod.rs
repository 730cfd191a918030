//! Domain models for Nexus.
//!
//! These types represent validated domain objects separate from database row
//! types and from the JSON request bodies accepted by the routes.

pub mod session;
pub mod team;
pub mod user;

pub use session::{CurrentUser, keys};
pub use team::{NewTeamMember, TeamMember, TeamMemberChanges, TeamMemberInput, TeamMemberPatch};
pub use user::{NewUser, Registration, User};
