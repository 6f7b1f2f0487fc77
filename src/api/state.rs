//! Shared application state handed to every handler via `Extension`.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    assets::AssetStore, identity::IdentityProvider, store::MemberStore, store::WorkspaceStore,
    sync::WorkspaceLocks,
};

pub struct AppState {
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub members: Arc<dyn MemberStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub assets: Arc<dyn AssetStore>,
    pub locks: WorkspaceLocks,
    /// Connection pool backing the Postgres stores; `None` when the service
    /// runs on the in-memory backend (tests, standalone integration server).
    pub database: Option<PgPool>,
}

impl AppState {
    /// State over arbitrary backends, without a database pool to ping.
    #[must_use]
    pub fn new(
        workspaces: Arc<dyn WorkspaceStore>,
        members: Arc<dyn MemberStore>,
        identity: Arc<dyn IdentityProvider>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            workspaces,
            members,
            identity,
            assets,
            locks: WorkspaceLocks::default(),
            database: None,
        }
    }
}
