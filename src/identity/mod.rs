//! Client for the external identity provider.
//!
//! Users and sessions are owned by the provider; this service only resolves a
//! session token into a user and reads user records for member listings. The
//! HTTP client is the production implementation; the in-memory provider backs
//! tests and the standalone integration server.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod http;
pub mod memory;

pub use http::HttpIdentityProvider;
pub use memory::MemoryIdentityProvider;

/// Identity record as returned by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a session token into its user.
    ///
    /// `Ok(None)` means the token is unknown or expired; transport failures
    /// are errors so callers can distinguish "no session" from "provider down".
    async fn resolve_session(&self, session_token: &str) -> Result<Option<User>>;

    /// Fetch a user by id, for enriching member listings.
    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Whether the provider is reachable; reported by `/health`.
    async fn healthy(&self) -> bool;
}
