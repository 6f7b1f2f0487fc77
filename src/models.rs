//! Record types shared by the stores and the API handlers.
//!
//! Workspaces and members are the two documents this service owns. Users are
//! owned by the external identity provider and only read here, so the `User`
//! record lives with the identity client (`crate::identity`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership role inside a workspace.
///
/// Serialized as `ADMIN` / `MEMBER` on the wire and in the database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Canonical string form, matching the `role` column check constraint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }

    /// Parse the canonical string form; unknown values are rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "MEMBER" => Some(Self::Member),
            _ => None,
        }
    }
}

/// A named collaborative container, owned collectively by its members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    /// User id of the creator, as issued by the identity provider.
    pub created_by: String,
    /// Public URL of the workspace image on the asset CDN, when set.
    pub image_url: Option<String>,
    /// Single active join secret; rotated as a whole, never versioned.
    pub invite_code: String,
    pub created_at_unix: i64,
}

/// The join entity binding a user to a workspace with a role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub id: String,
    pub workspace_id: String,
    pub user_id: String,
    pub role: Role,
    pub created_at_unix: i64,
}

/// Unix seconds for document timestamps.
#[must_use]
pub fn now_unix_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_canonical_strings() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("MEMBER"), Some(Role::Member));
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::Member.as_str(), "MEMBER");
    }

    #[test]
    fn role_parse_rejects_unknown_and_lowercase() {
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("OWNER"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn role_serializes_screaming_case() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize role");
        assert_eq!(json, "\"ADMIN\"");
        let parsed: Role = serde_json::from_str("\"MEMBER\"").expect("deserialize role");
        assert_eq!(parsed, Role::Member);
    }
}
