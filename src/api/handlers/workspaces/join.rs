//! Join-by-invite-code handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use ulid::Ulid;

use crate::{
    api::{
        error::ApiError,
        handlers::{auth::require_auth, data},
        state::AppState,
    },
    models::{now_unix_seconds, Member, Role, Workspace},
    store::{MemberStore, WorkspaceStore},
};

use super::types::JoinWorkspaceRequest;

#[utoipa::path(
    post,
    path = "/v1/workspaces/{workspace_id}/join",
    params(("workspace_id" = String, Path, description = "Workspace id")),
    request_body = JoinWorkspaceRequest,
    responses(
        (status = 200, description = "Joined; the workspace is returned wrapped under `data`.", body = Workspace),
        (status = 400, description = "Already a member, or the code does not match."),
        (status = 401, description = "Missing or invalid session."),
        (status = 404, description = "Workspace not found."),
    ),
    tag = "workspaces"
)]
/// Joins a workspace by invite code, creating a MEMBER-role membership.
/// The code comparison is exact and case-sensitive against the single active
/// code; an existing membership is a normal rejection, not an error.
pub async fn join_workspace(
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<JoinWorkspaceRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;
    let Some(Json(payload)) = payload else {
        return Err(ApiError::BusinessRule("Missing payload"));
    };

    // Lock before the membership check so two concurrent joins with the same
    // code cannot both pass it.
    let _guard = state.locks.acquire(&workspace_id).await;

    let workspace = state
        .workspaces
        .get_by_id(&workspace_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;

    let existing = state
        .members
        .find_by_workspace_and_user(&workspace_id, &principal.user_id)
        .await?;
    if existing.is_some() {
        return Err(ApiError::BusinessRule("Already a member"));
    }

    if payload.code != workspace.invite_code {
        return Err(ApiError::BusinessRule("Invalid invite code"));
    }

    let member = Member {
        id: Ulid::new().to_string(),
        workspace_id: workspace.id.clone(),
        user_id: principal.user_id,
        role: Role::Member,
        created_at_unix: now_unix_seconds(),
    };
    state.members.create(&member).await?;

    Ok(data(workspace))
}
