//! OpenAPI document for the API surface.
//!
//! Add new endpoints to `paths(...)` so they show up in the generated spec;
//! `/` and the Swagger UI itself are intentionally undocumented.

use utoipa::OpenApi;

use crate::{
    api::handlers::{health, members, workspaces, DocumentId},
    identity::User,
    models::{Member, Role, Workspace},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        workspaces::workspaces::list_workspaces,
        workspaces::workspaces::create_workspace,
        workspaces::workspaces::update_workspace,
        workspaces::workspaces::delete_workspace,
        workspaces::workspaces::reset_invite_code,
        workspaces::join::join_workspace,
        members::members::list_members,
        members::members::remove_member,
        members::members::update_member_role,
    ),
    components(schemas(
        Workspace,
        Member,
        Role,
        User,
        DocumentId,
        workspaces::JoinWorkspaceRequest,
        members::MemberResponse,
        members::UpdateMemberRoleRequest,
        health::Health,
    )),
    tags(
        (name = "workspaces", description = "Workspace lifecycle and invite-code joining"),
        (name = "members", description = "Role-based membership administration"),
        (name = "health", description = "Service and dependency health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_operation() {
        let doc = openapi();
        let paths = &doc.paths.paths;
        for expected in [
            "/health",
            "/v1/workspaces",
            "/v1/workspaces/{workspace_id}",
            "/v1/workspaces/{workspace_id}/reset-invite-code",
            "/v1/workspaces/{workspace_id}/join",
            "/v1/members",
            "/v1/members/{member_id}",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }
}
