//! API handlers and shared response helpers.
//!
//! Handlers parse inputs and map the high-level flow; storage access goes
//! through the trait objects on [`crate::api::state::AppState`]. Successful
//! responses wrap their payload under a `data` key; failures are produced by
//! [`crate::api::error::ApiError`].

pub mod auth;
pub mod health;
pub mod members;
pub mod root;
pub mod workspaces;

#[cfg(test)]
pub(crate) mod test_support;

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope: `{"data": …}`.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub fn data<T: Serialize>(value: T) -> Json<DataBody<T>> {
    Json(DataBody { data: value })
}

/// Id-only payload returned by delete and role-change operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentId {
    pub id: String,
}
