//! Postgres store backend.
//!
//! Queries mirror the document shapes one to one; see `sql/schema.sql` for
//! the tables and indexes. The (workspace, user) uniqueness invariant is
//! enforced here by a unique index rather than a scan.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::models::{Member, Role, Workspace};

use super::{MemberStore, WorkspaceStore};

#[derive(Clone)]
pub struct PostgresWorkspaceStore {
    pool: PgPool,
}

impl PostgresWorkspaceStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn workspace_from_row(row: &PgRow) -> Workspace {
    Workspace {
        id: row.get("id"),
        name: row.get("name"),
        created_by: row.get("created_by"),
        image_url: row.get("image_url"),
        invite_code: row.get("invite_code"),
        created_at_unix: row.get("created_at_unix"),
    }
}

fn member_from_row(row: &PgRow) -> Result<Member> {
    let role: String = row.get("role");
    let role = Role::parse(&role).ok_or_else(|| anyhow!("unknown role in database: {role}"))?;
    Ok(Member {
        id: row.get("id"),
        workspace_id: row.get("workspace_id"),
        user_id: row.get("user_id"),
        role,
        created_at_unix: row.get("created_at_unix"),
    })
}

#[async_trait]
impl WorkspaceStore for PostgresWorkspaceStore {
    async fn create(&self, workspace: &Workspace) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO workspaces (id, name, created_by, image_url, invite_code, created_at_unix)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&workspace.id)
        .bind(&workspace.name)
        .bind(&workspace.created_by)
        .bind(&workspace.image_url)
        .bind(&workspace.invite_code)
        .bind(workspace.created_at_unix)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, workspace_id: &str) -> Result<Option<Workspace>> {
        let row = sqlx::query(
            r"
            SELECT id, name, created_by, image_url, invite_code, created_at_unix
            FROM workspaces
            WHERE id = $1
            ",
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(workspace_from_row))
    }

    async fn update(&self, workspace: &Workspace) -> Result<usize> {
        let result = sqlx::query(
            r"
            UPDATE workspaces
            SET name = $1, image_url = $2, invite_code = $3
            WHERE id = $4
            ",
        )
        .bind(&workspace.name)
        .bind(&workspace.image_url)
        .bind(&workspace.invite_code)
        .bind(&workspace.id)
        .execute(&self.pool)
        .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn delete(&self, workspace_id: &str) -> Result<usize> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(workspace_id)
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn list_by_ids(&self, workspace_ids: &[String]) -> Result<Vec<Workspace>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, created_by, image_url, invite_code, created_at_unix
            FROM workspaces
            WHERE id = ANY($1)
            ORDER BY created_at_unix DESC, id DESC
            ",
        )
        .bind(workspace_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(workspace_from_row).collect())
    }
}

#[derive(Clone)]
pub struct PostgresMemberStore {
    pool: PgPool,
}

impl PostgresMemberStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PostgresMemberStore {
    async fn create(&self, member: &Member) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO members (id, workspace_id, user_id, role, created_at_unix)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&member.id)
        .bind(&member.workspace_id)
        .bind(&member.user_id)
        .bind(member.role.as_str())
        .bind(member.created_at_unix)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, member_id: &str) -> Result<Option<Member>> {
        let row = sqlx::query(
            r"
            SELECT id, workspace_id, user_id, role, created_at_unix
            FROM members
            WHERE id = $1
            ",
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn find_by_workspace_and_user(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>> {
        let row = sqlx::query(
            r"
            SELECT id, workspace_id, user_id, role, created_at_unix
            FROM members
            WHERE workspace_id = $1 AND user_id = $2
            ",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r"
            SELECT id, workspace_id, user_id, role, created_at_unix
            FROM members
            WHERE workspace_id = $1
            ORDER BY created_at_unix ASC, id ASC
            ",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(member_from_row).collect()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r"
            SELECT id, workspace_id, user_id, role, created_at_unix
            FROM members
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(member_from_row).collect()
    }

    async fn update_role(&self, member_id: &str, role: Role) -> Result<usize> {
        let result = sqlx::query("UPDATE members SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(member_id)
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn delete(&self, member_id: &str) -> Result<usize> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn delete_by_workspace(&self, workspace_id: &str) -> Result<usize> {
        let result = sqlx::query("DELETE FROM members WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }
}
