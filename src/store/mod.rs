//! Document-store abstraction for the records this service owns.
//!
//! Handlers only ever talk to these traits, so the whole API surface can be
//! exercised against the in-memory backend without a database. The Postgres
//! backend is the production implementation; both guarantee that a read
//! following a write in the same operation observes the write.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Member, Role, Workspace};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryMemberStore, MemoryWorkspaceStore};
pub use postgres::{PostgresMemberStore, PostgresWorkspaceStore};

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn create(&self, workspace: &Workspace) -> Result<()>;

    async fn get_by_id(&self, workspace_id: &str) -> Result<Option<Workspace>>;

    /// Persist the full record for `workspace.id`; returns affected row count.
    async fn update(&self, workspace: &Workspace) -> Result<usize>;

    async fn delete(&self, workspace_id: &str) -> Result<usize>;

    /// Fetch the given workspaces, newest first.
    async fn list_by_ids(&self, workspace_ids: &[String]) -> Result<Vec<Workspace>>;
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Insert a membership. A (workspace, user) pair holds at most one
    /// membership; a duplicate insert is an error in both backends.
    async fn create(&self, member: &Member) -> Result<()>;

    async fn get_by_id(&self, member_id: &str) -> Result<Option<Member>>;

    /// The single membership binding `user_id` to `workspace_id`, if any.
    async fn find_by_workspace_and_user(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>>;

    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Member>>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Member>>;

    async fn update_role(&self, member_id: &str, role: Role) -> Result<usize>;

    async fn delete(&self, member_id: &str) -> Result<usize>;

    /// Remove every membership of a workspace; used when the workspace itself
    /// is deleted so no membership rows are left pointing at nothing.
    async fn delete_by_workspace(&self, workspace_id: &str) -> Result<usize>;
}
