//! In-memory store backend.
//!
//! Backs the handler tests and the standalone integration server. Each store
//! is a mutex-guarded map keyed by document id; no guard is held across an
//! await point.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{Member, Role, Workspace};

use super::{MemberStore, WorkspaceStore};

#[derive(Debug, Default)]
pub struct MemoryWorkspaceStore {
    workspaces: Mutex<HashMap<String, Workspace>>,
}

impl MemoryWorkspaceStore {
    fn locked(&self) -> Result<MutexGuard<'_, HashMap<String, Workspace>>> {
        self.workspaces
            .lock()
            .map_err(|_| anyhow!("workspace store lock poisoned"))
    }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    async fn create(&self, workspace: &Workspace) -> Result<()> {
        let mut workspaces = self.locked()?;
        workspaces.insert(workspace.id.clone(), workspace.clone());
        Ok(())
    }

    async fn get_by_id(&self, workspace_id: &str) -> Result<Option<Workspace>> {
        let workspaces = self.locked()?;
        Ok(workspaces.get(workspace_id).cloned())
    }

    async fn update(&self, workspace: &Workspace) -> Result<usize> {
        let mut workspaces = self.locked()?;
        if !workspaces.contains_key(&workspace.id) {
            return Ok(0);
        }
        workspaces.insert(workspace.id.clone(), workspace.clone());
        Ok(1)
    }

    async fn delete(&self, workspace_id: &str) -> Result<usize> {
        let mut workspaces = self.locked()?;
        Ok(usize::from(workspaces.remove(workspace_id).is_some()))
    }

    async fn list_by_ids(&self, workspace_ids: &[String]) -> Result<Vec<Workspace>> {
        let workspaces = self.locked()?;
        let mut selected: Vec<Workspace> = workspace_ids
            .iter()
            .filter_map(|id| workspaces.get(id).cloned())
            .collect();
        // Newest first; id as tiebreak keeps the order stable within a second.
        selected.sort_by(|a, b| {
            b.created_at_unix
                .cmp(&a.created_at_unix)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(selected)
    }
}

#[derive(Debug, Default)]
pub struct MemoryMemberStore {
    members: Mutex<HashMap<String, Member>>,
}

impl MemoryMemberStore {
    fn locked(&self) -> Result<MutexGuard<'_, HashMap<String, Member>>> {
        self.members
            .lock()
            .map_err(|_| anyhow!("member store lock poisoned"))
    }
}

#[async_trait]
impl MemberStore for MemoryMemberStore {
    async fn create(&self, member: &Member) -> Result<()> {
        let mut members = self.locked()?;
        let duplicate = members
            .values()
            .any(|m| m.workspace_id == member.workspace_id && m.user_id == member.user_id);
        if duplicate {
            return Err(anyhow!(
                "membership already exists for user {} in workspace {}",
                member.user_id,
                member.workspace_id
            ));
        }
        members.insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn get_by_id(&self, member_id: &str) -> Result<Option<Member>> {
        let members = self.locked()?;
        Ok(members.get(member_id).cloned())
    }

    async fn find_by_workspace_and_user(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>> {
        let members = self.locked()?;
        Ok(members
            .values()
            .find(|m| m.workspace_id == workspace_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Member>> {
        let members = self.locked()?;
        let mut selected: Vec<Member> = members
            .values()
            .filter(|m| m.workspace_id == workspace_id)
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            a.created_at_unix
                .cmp(&b.created_at_unix)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(selected)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Member>> {
        let members = self.locked()?;
        Ok(members
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_role(&self, member_id: &str, role: Role) -> Result<usize> {
        let mut members = self.locked()?;
        match members.get_mut(member_id) {
            Some(member) => {
                member.role = role;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, member_id: &str) -> Result<usize> {
        let mut members = self.locked()?;
        Ok(usize::from(members.remove(member_id).is_some()))
    }

    async fn delete_by_workspace(&self, workspace_id: &str) -> Result<usize> {
        let mut members = self.locked()?;
        let doomed: Vec<String> = members
            .values()
            .filter(|m| m.workspace_id == workspace_id)
            .map(|m| m.id.clone())
            .collect();
        for id in &doomed {
            members.remove(id);
        }
        Ok(doomed.len())
    }
}
