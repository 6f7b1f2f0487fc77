//! # Laborejo (Collaborative Workspace Management)
//!
//! `laborejo` manages workspaces, invite-code joining, and role-based
//! membership on top of two external collaborators: an identity provider
//! that owns users and sessions, and an asset CDN that hosts workspace
//! images.
//!
//! ## Tenant Model (Workspaces and Members)
//!
//! Workspaces are the collaboration boundary. Each workspace keeps a single
//! rotating invite code and a set of members with `ADMIN` or `MEMBER` roles.
//!
//! - **Floor Invariant:** a workspace never drops to zero members, and a role
//!   change never leaves it without an `ADMIN`.
//! - **Invite Codes:** one active code per workspace; rotating it invalidates
//!   the previous code immediately.
//! - **Assets:** only the public URL of a workspace image is stored; the
//!   asset itself lives on the CDN and is cleaned up best effort.
//!
//! ## Authentication
//!
//! Requests carry a session token (cookie or bearer) minted by the identity
//! provider; this service resolves it per request and never stores sessions.
//! Provider failures collapse to `401` rather than leaking provider state.
//!
//! ## Storage
//!
//! All documents go through the store traits in [`store`], with a Postgres
//! backend in production and an in-memory backend for tests, so every
//! authorization and lifecycle rule is exercisable without a database.

pub mod api;
pub mod assets;
pub mod cli;
pub mod identity;
pub mod models;
pub mod store;
pub mod sync;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
