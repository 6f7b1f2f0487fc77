//! Member listing, removal, and role-change handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use anyhow::anyhow;

use crate::{
    api::{
        error::ApiError,
        handlers::{auth::require_auth, data, DocumentId},
        state::AppState,
    },
    identity::IdentityProvider,
    models::{Member, Role},
    store::MemberStore,
};

use super::types::{ListMembersQuery, MemberResponse, UpdateMemberRoleRequest};

/// The caller's membership in `workspace_id`, or `Unauthorized`.
async fn require_membership(
    state: &AppState,
    workspace_id: &str,
    user_id: &str,
) -> Result<Member, ApiError> {
    state
        .members
        .find_by_workspace_and_user(workspace_id, user_id)
        .await?
        .ok_or(ApiError::Unauthorized)
}

/// Self-or-ADMIN rule shared by removal and role changes.
fn authorize_mutation(requester: &Member, target: &Member) -> Result<(), ApiError> {
    if requester.id != target.id && requester.role != Role::Admin {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/v1/members",
    params(("workspace_id" = String, Query, description = "Workspace id")),
    responses(
        (status = 200, description = "Members enriched with name and email, wrapped under `data`.", body = [MemberResponse]),
        (status = 401, description = "Caller has no membership in this workspace."),
    ),
    tag = "members"
)]
/// Lists a workspace's members with each user's name and email.
/// Any membership grants access; enrichment failures surface as a dependency
/// failure rather than a partial listing.
pub async fn list_members(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    Query(query): Query<ListMembersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;
    require_membership(&state, &query.workspace_id, &principal.user_id).await?;

    let members = state.members.list_by_workspace(&query.workspace_id).await?;

    let mut enriched = Vec::with_capacity(members.len());
    for member in members {
        let user = state
            .identity
            .fetch_user(&member.user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Dependency(anyhow!(
                    "identity provider has no user {} referenced by member {}",
                    member.user_id,
                    member.id
                ))
            })?;
        enriched.push(MemberResponse::from_member(member, user.name, user.email));
    }

    Ok(data(enriched))
}

#[utoipa::path(
    delete,
    path = "/v1/members/{member_id}",
    params(("member_id" = String, Path, description = "Member id")),
    responses(
        (status = 200, description = "Removed member id, wrapped under `data`.", body = DocumentId),
        (status = 400, description = "The workspace's only member cannot be removed."),
        (status = 401, description = "Caller is neither the member nor an ADMIN."),
        (status = 404, description = "Member not found."),
    ),
    tag = "members"
)]
/// Removes a member, by themself or by an ADMIN.
/// The floor invariant is checked against the pre-removal count under the
/// workspace lock: the last membership can never be deleted.
pub async fn remove_member(
    Path(member_id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;

    let target = state
        .members
        .get_by_id(&member_id)
        .await?
        .ok_or(ApiError::NotFound("Member"))?;

    let _guard = state.locks.acquire(&target.workspace_id).await;

    let requester = require_membership(&state, &target.workspace_id, &principal.user_id).await?;
    authorize_mutation(&requester, &target)?;

    let member_count = state
        .members
        .list_by_workspace(&target.workspace_id)
        .await?
        .len();
    if member_count == 1 {
        return Err(ApiError::BusinessRule("Cannot remove the only member"));
    }

    state.members.delete(&target.id).await?;

    Ok(data(DocumentId { id: target.id }))
}

#[utoipa::path(
    patch,
    path = "/v1/members/{member_id}",
    params(("member_id" = String, Path, description = "Member id")),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Updated member id, wrapped under `data`.", body = DocumentId),
        (status = 400, description = "Sole member, sole ADMIN demotion, or missing payload."),
        (status = 401, description = "Caller is neither the member nor an ADMIN."),
        (status = 404, description = "Member not found."),
    ),
    tag = "members"
)]
/// Changes a member's role, by themself or by an ADMIN.
/// Rejected for the workspace's only member and for any change that would
/// demote the last remaining ADMIN, so a workspace always keeps an admin.
pub async fn update_member_role(
    Path(member_id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<UpdateMemberRoleRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;
    let Some(Json(payload)) = payload else {
        return Err(ApiError::BusinessRule("Missing payload"));
    };

    let target = state
        .members
        .get_by_id(&member_id)
        .await?
        .ok_or(ApiError::NotFound("Member"))?;

    let _guard = state.locks.acquire(&target.workspace_id).await;

    let requester = require_membership(&state, &target.workspace_id, &principal.user_id).await?;
    authorize_mutation(&requester, &target)?;

    let members = state.members.list_by_workspace(&target.workspace_id).await?;
    if members.len() == 1 {
        return Err(ApiError::BusinessRule(
            "Cannot change the role of the only member",
        ));
    }

    let admin_count = members
        .iter()
        .filter(|member| member.role == Role::Admin)
        .count();
    if target.role == Role::Admin && payload.role == Role::Member && admin_count == 1 {
        return Err(ApiError::BusinessRule("Cannot demote the only admin"));
    }

    state.members.update_role(&target.id, payload.role).await?;

    Ok(data(DocumentId { id: target.id }))
}
