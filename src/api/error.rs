//! Error taxonomy for the API surface.
//!
//! Every failure a handler can produce maps onto one of these variants; the
//! `IntoResponse` impl owns the status mapping and the `{"error": …}`
//! envelope so handlers never build error bodies by hand.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// No usable session; also covers identity-provider failures, which
    /// collapse to "unauthenticated" rather than leaking provider state.
    Unauthenticated,
    /// Authenticated but lacking the membership or role the operation needs.
    Unauthorized,
    /// A business rule rejected the operation; the message is user-facing.
    BusinessRule(&'static str),
    /// The referenced document does not exist.
    NotFound(&'static str),
    /// An external dependency (store, identity provider, CDN) failed.
    /// Details are logged server-side only.
    Dependency(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated | Self::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            Self::BusinessRule(message) => (StatusCode::BAD_REQUEST, message.to_string()),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::Dependency(err) => {
                error!("External dependency failure: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service dependency failure".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Dependency(err)
    }
}
