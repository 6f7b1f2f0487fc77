//! Workspace CRUD and invite-code rotation handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::warn;
use ulid::Ulid;

use crate::{
    api::{
        error::ApiError,
        handlers::{auth::require_auth, data, DocumentId},
        state::AppState,
    },
    assets::{public_id_from_url, AssetStore, WORKSPACE_IMAGE_FOLDER},
    models::{now_unix_seconds, Member, Role, Workspace},
    store::{MemberStore, WorkspaceStore},
};

use super::{
    form::{parse_workspace_form, ImageField},
    invite::{generate_invite_code, INVITE_CODE_LENGTH},
    WORKSPACE_NAME_MAX,
};

/// Delete the asset behind a stored image URL, best effort.
///
/// Asset cleanup never fails the surrounding operation; an orphaned asset is
/// preferable to a half-applied workspace mutation.
pub(super) async fn delete_image_asset(assets: &dyn AssetStore, image_url: &str) {
    match public_id_from_url(WORKSPACE_IMAGE_FOLDER, image_url) {
        Some(public_id) => {
            if let Err(err) = assets.delete(&public_id).await {
                warn!(%public_id, error = %err, "image asset deletion failed; asset may be orphaned");
            }
        }
        None => warn!(image_url, "stored image URL has no derivable public id"),
    }
}

/// The caller's ADMIN membership in `workspace_id`, or `Unauthorized`.
pub(super) async fn require_admin(
    state: &AppState,
    workspace_id: &str,
    user_id: &str,
) -> Result<Member, ApiError> {
    let membership = state
        .members
        .find_by_workspace_and_user(workspace_id, user_id)
        .await?;
    match membership {
        Some(member) if member.role == Role::Admin => Ok(member),
        Some(_) | None => Err(ApiError::Unauthorized),
    }
}

#[utoipa::path(
    get,
    path = "/v1/workspaces",
    responses(
        (status = 200, description = "Workspaces the caller belongs to, newest first, wrapped under `data`.", body = [Workspace]),
        (status = 401, description = "Missing or invalid session."),
    ),
    tag = "workspaces"
)]
/// Lists every workspace the caller holds a membership in, newest first.
/// A caller with no memberships gets an empty list, not an error.
pub async fn list_workspaces(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;

    let memberships = state.members.list_by_user(&principal.user_id).await?;
    if memberships.is_empty() {
        return Ok(data(Vec::<Workspace>::new()));
    }

    let workspace_ids: Vec<String> = memberships
        .into_iter()
        .map(|member| member.workspace_id)
        .collect();
    let workspaces = state.workspaces.list_by_ids(&workspace_ids).await?;

    Ok(data(workspaces))
}

#[utoipa::path(
    post,
    path = "/v1/workspaces",
    responses(
        (status = 201, description = "Workspace created, wrapped under `data`; the creator holds an ADMIN membership.", body = Workspace),
        (status = 400, description = "Missing or invalid form fields."),
        (status = 401, description = "Missing or invalid session."),
    ),
    tag = "workspaces"
)]
/// Creates a workspace with a fresh invite code and the creator as ADMIN.
/// An image upload failure fails the whole operation so no workspace row is
/// written; a failed membership write rolls the workspace row back.
pub async fn create_workspace(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;

    let form = parse_workspace_form(&mut multipart).await?;
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::BusinessRule("Workspace name is required"))?;
    if name.len() > WORKSPACE_NAME_MAX {
        return Err(ApiError::BusinessRule("Workspace name is too long"));
    }

    let image_url = match form.image {
        Some(ImageField::Upload { filename, bytes }) => Some(
            state
                .assets
                .upload(WORKSPACE_IMAGE_FOLDER, &filename, bytes)
                .await
                .map_err(ApiError::Dependency)?,
        ),
        Some(ImageField::Remove) | None => None,
    };

    let workspace = Workspace {
        id: Ulid::new().to_string(),
        name: name.to_string(),
        created_by: principal.user_id.clone(),
        image_url,
        invite_code: generate_invite_code(INVITE_CODE_LENGTH),
        created_at_unix: now_unix_seconds(),
    };

    if let Err(err) = state.workspaces.create(&workspace).await {
        if workspace.image_url.is_some() {
            warn!(workspace_id = %workspace.id, "workspace insert failed after image upload; asset is orphaned");
        }
        return Err(ApiError::Dependency(err));
    }

    let member = Member {
        id: Ulid::new().to_string(),
        workspace_id: workspace.id.clone(),
        user_id: principal.user_id,
        role: Role::Admin,
        created_at_unix: now_unix_seconds(),
    };

    if let Err(err) = state.members.create(&member).await {
        // Roll the workspace row back so no memberless workspace survives the
        // partial write.
        if let Err(cleanup) = state.workspaces.delete(&workspace.id).await {
            warn!(workspace_id = %workspace.id, error = %cleanup, "compensating workspace delete failed");
        }
        return Err(ApiError::Dependency(err));
    }

    Ok((StatusCode::CREATED, data(workspace)))
}

#[utoipa::path(
    patch,
    path = "/v1/workspaces/{workspace_id}",
    params(("workspace_id" = String, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Updated workspace, wrapped under `data`.", body = Workspace),
        (status = 400, description = "Invalid form fields."),
        (status = 401, description = "Caller is not an ADMIN of this workspace."),
        (status = 404, description = "Workspace not found."),
    ),
    tag = "workspaces"
)]
/// Renames a workspace and/or replaces or removes its image.
/// A replacement uploads the new asset first, then best-effort deletes the
/// old one; the removal sentinel clears the stored URL the same way.
pub async fn update_workspace(
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;
    let form = parse_workspace_form(&mut multipart).await?;

    require_admin(&state, &workspace_id, &principal.user_id).await?;

    let name = match form.name.as_deref() {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ApiError::BusinessRule("Workspace name is required"));
            }
            if trimmed.len() > WORKSPACE_NAME_MAX {
                return Err(ApiError::BusinessRule("Workspace name is too long"));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let _guard = state.locks.acquire(&workspace_id).await;
    let mut workspace = state
        .workspaces
        .get_by_id(&workspace_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;

    match form.image {
        Some(ImageField::Upload { filename, bytes }) => {
            let new_url = state
                .assets
                .upload(WORKSPACE_IMAGE_FOLDER, &filename, bytes)
                .await
                .map_err(ApiError::Dependency)?;
            if let Some(old_url) = workspace.image_url.take() {
                delete_image_asset(state.assets.as_ref(), &old_url).await;
            }
            workspace.image_url = Some(new_url);
        }
        Some(ImageField::Remove) => {
            if let Some(old_url) = workspace.image_url.take() {
                delete_image_asset(state.assets.as_ref(), &old_url).await;
            }
        }
        None => {}
    }

    if let Some(name) = name {
        workspace.name = name;
    }

    state.workspaces.update(&workspace).await?;

    Ok(data(workspace))
}

#[utoipa::path(
    delete,
    path = "/v1/workspaces/{workspace_id}",
    params(("workspace_id" = String, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Deleted workspace id, wrapped under `data`.", body = DocumentId),
        (status = 401, description = "Caller is not an ADMIN of this workspace."),
        (status = 404, description = "Workspace not found."),
    ),
    tag = "workspaces"
)]
/// Deletes a workspace, its membership rows, and its image asset.
/// Memberships are removed first so no membership row is left pointing at a
/// deleted workspace; asset cleanup stays best effort.
pub async fn delete_workspace(
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;
    require_admin(&state, &workspace_id, &principal.user_id).await?;

    let _guard = state.locks.acquire(&workspace_id).await;
    let workspace = state
        .workspaces
        .get_by_id(&workspace_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;

    if let Some(image_url) = &workspace.image_url {
        delete_image_asset(state.assets.as_ref(), image_url).await;
    }

    state.members.delete_by_workspace(&workspace_id).await?;
    state.workspaces.delete(&workspace_id).await?;

    Ok(data(DocumentId { id: workspace.id }))
}

#[utoipa::path(
    post,
    path = "/v1/workspaces/{workspace_id}/reset-invite-code",
    params(("workspace_id" = String, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Workspace with its new invite code, wrapped under `data`.", body = Workspace),
        (status = 401, description = "Caller is not an ADMIN of this workspace."),
        (status = 404, description = "Workspace not found."),
    ),
    tag = "workspaces"
)]
/// Rotates the workspace's invite code.
/// The previous code stops authorizing joins the moment the new one is
/// persisted; codes are single-valued, never multi-valid.
pub async fn reset_invite_code(
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, state.identity.as_ref()).await?;
    require_admin(&state, &workspace_id, &principal.user_id).await?;

    let _guard = state.locks.acquire(&workspace_id).await;
    let mut workspace = state
        .workspaces
        .get_by_id(&workspace_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;

    workspace.invite_code = generate_invite_code(INVITE_CODE_LENGTH);
    state.workspaces.update(&workspace).await?;

    Ok(data(workspace))
}
