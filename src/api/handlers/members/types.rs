//! Request/response types for membership endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Member, Role};

#[derive(Debug, Deserialize)]
pub struct ListMembersQuery {
    pub workspace_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMemberRoleRequest {
    pub role: Role,
}

/// Membership record enriched with the user's display name and email from
/// the identity provider.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: String,
    pub workspace_id: String,
    pub user_id: String,
    pub role: Role,
    pub created_at_unix: i64,
    pub name: String,
    pub email: String,
}

impl MemberResponse {
    pub(super) fn from_member(member: Member, name: String, email: String) -> Self {
        Self {
            id: member.id,
            workspace_id: member.workspace_id,
            user_id: member.user_id,
            role: member.role,
            created_at_unix: member.created_at_unix,
            name,
            email,
        }
    }
}
