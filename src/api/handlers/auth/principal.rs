//! Authenticated principal extraction.

use axum::http::HeaderMap;
use tracing::warn;

use crate::{api::error::ApiError, identity::IdentityProvider};

use super::session::extract_session_token;

/// Authenticated user context derived from the session token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Resolve the request's session token into a principal.
///
/// Missing tokens, unknown sessions, and identity-provider failures all
/// collapse to `Unauthenticated`; provider failures are logged but never
/// surfaced to callers.
pub async fn require_auth(
    headers: &HeaderMap,
    identity: &dyn IdentityProvider,
) -> Result<Principal, ApiError> {
    let Some(token) = extract_session_token(headers) else {
        return Err(ApiError::Unauthenticated);
    };
    match identity.resolve_session(&token).await {
        Ok(Some(user)) => Ok(Principal {
            user_id: user.id,
            name: user.name,
            email: user.email,
        }),
        Ok(None) => Err(ApiError::Unauthenticated),
        Err(err) => {
            warn!(error = %err, "session resolution failed; treating request as unauthenticated");
            Err(ApiError::Unauthenticated)
        }
    }
}
