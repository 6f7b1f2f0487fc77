//! In-memory identity provider for tests and the standalone server.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{IdentityProvider, User};

#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    /// session token -> user id
    sessions: Mutex<HashMap<String, String>>,
    users: Mutex<HashMap<String, User>>,
}

impl MemoryIdentityProvider {
    /// Register a user and a session token resolving to it.
    pub fn insert_session(&self, token: &str, user: User) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(token.to_string(), user.id.clone());
        }
        if let Ok(mut users) = self.users.lock() {
            users.insert(user.id.clone(), user);
        }
    }

    /// Register a user without any session, for `fetch_user` lookups.
    pub fn insert_user(&self, user: User) {
        if let Ok(mut users) = self.users.lock() {
            users.insert(user.id.clone(), user);
        }
    }

    pub fn revoke_session(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(token);
        }
    }

    fn sessions_locked(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow!("identity sessions lock poisoned"))
    }

    fn users_locked(&self) -> Result<MutexGuard<'_, HashMap<String, User>>> {
        self.users
            .lock()
            .map_err(|_| anyhow!("identity users lock poisoned"))
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn resolve_session(&self, session_token: &str) -> Result<Option<User>> {
        let user_id = match self.sessions_locked()?.get(session_token).cloned() {
            Some(user_id) => user_id,
            None => return Ok(None),
        };
        Ok(self.users_locked()?.get(&user_id).cloned())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users_locked()?.get(user_id).cloned())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
