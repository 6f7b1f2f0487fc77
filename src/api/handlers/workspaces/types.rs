//! Request payloads for workspace endpoints.
//!
//! Workspace responses serialize the [`crate::models::Workspace`] record
//! directly; create/update inputs arrive as multipart forms and are parsed in
//! `form.rs` rather than derived here.

use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinWorkspaceRequest {
    /// Invite code; compared byte-for-byte against the workspace's code.
    pub code: String,
}
