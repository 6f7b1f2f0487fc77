//! Workspace lifecycle endpoints.
//!
//! Workspaces are the collaboration boundary: every workspace is owned
//! collectively by its members and guarded by role-based rules. Creating a
//! workspace also creates the creator's ADMIN membership; joining goes
//! through a single rotating invite code; images live on the external asset
//! CDN and only their public URL is stored on the workspace record.
//!
//! This module is split into small route-focused files plus shared form
//! parsing, so the HTTP surface stays easy to read. Handlers parse inputs
//! and map the high-level flow; all document access goes through the store
//! traits so the whole feature is testable without a database.
//!
//! Flow Overview:
//! 1) Authenticate via session token.
//! 2) Look up the caller's membership in the target workspace.
//! 3) Enforce the ADMIN role for writes, any membership for reads.
//! 4) Perform the lifecycle mutation, serialized per workspace where a
//!    check-then-act window exists (join, delete, invite rotation).

mod form;
pub(crate) mod invite;
pub(crate) mod join;
mod types;
pub(crate) mod workspaces;

pub use join::join_workspace;
pub use types::JoinWorkspaceRequest;
pub use workspaces::{
    create_workspace, delete_workspace, list_workspaces, reset_invite_code, update_workspace,
};

const WORKSPACE_NAME_MAX: usize = 128;

/// Text value of the multipart `image` field that clears the stored image.
const IMAGE_REMOVE_SENTINEL: &str = "remove";
