//! Identity resolution for incoming requests.
//!
//! Flow Overview: read the session token from the cookie or bearer header,
//! resolve it against the external identity provider, and hand handlers a
//! [`principal::Principal`]. Workspace-scoped roles are resolved per
//! workspace in the feature handlers, not here.

pub mod principal;
pub mod session;

pub use principal::{require_auth, Principal};
