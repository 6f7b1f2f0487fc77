//! Shared harness for router-level handler tests.
//!
//! Builds the real router over in-memory backends so tests exercise the full
//! HTTP surface (status codes, envelopes, invariants) without a database or
//! live identity provider.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Request, StatusCode,
    },
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    api::{router, state::AppState},
    assets::MemoryAssetStore,
    identity::{MemoryIdentityProvider, User},
    models::{now_unix_seconds, Member, Role, Workspace},
    store::{MemberStore, MemoryMemberStore, MemoryWorkspaceStore, WorkspaceStore},
};

pub(crate) const BOUNDARY: &str = "laborejo-test-boundary";

pub(crate) struct TestApp {
    pub identity: Arc<MemoryIdentityProvider>,
    pub assets: Arc<MemoryAssetStore>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let identity = Arc::new(MemoryIdentityProvider::default());
        let assets = Arc::new(MemoryAssetStore::default());
        let state = Arc::new(AppState::new(
            Arc::new(MemoryWorkspaceStore::default()),
            Arc::new(MemoryMemberStore::default()),
            Arc::clone(&identity) as Arc<dyn crate::identity::IdentityProvider>,
            Arc::clone(&assets) as Arc<dyn crate::assets::AssetStore>,
        ));
        Self {
            identity,
            assets,
            state,
        }
    }

    pub(crate) fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    /// Register a user with the identity fake and a session token for it.
    pub(crate) fn login(&self, token: &str, user_id: &str) -> User {
        let user = user(user_id);
        self.identity.insert_session(token, user.clone());
        user
    }

    /// Run one request and decode the JSON body (Null when empty).
    pub(crate) async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.expect("request ran");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    pub(crate) async fn seed_workspace(&self, id: &str, invite_code: &str) -> Workspace {
        let workspace = Workspace {
            id: id.to_string(),
            name: format!("workspace {id}"),
            created_by: "seed".to_string(),
            image_url: None,
            invite_code: invite_code.to_string(),
            created_at_unix: now_unix_seconds(),
        };
        self.state
            .workspaces
            .create(&workspace)
            .await
            .expect("seed workspace");
        workspace
    }

    pub(crate) async fn seed_member(
        &self,
        id: &str,
        workspace_id: &str,
        user_id: &str,
        role: Role,
    ) -> Member {
        let member = Member {
            id: id.to_string(),
            workspace_id: workspace_id.to_string(),
            user_id: user_id.to_string(),
            role,
            created_at_unix: now_unix_seconds(),
        };
        self.state
            .members
            .create(&member)
            .await
            .expect("seed member");
        member
    }
}

pub(crate) fn user(user_id: &str) -> User {
    User {
        id: user_id.to_string(),
        name: format!("user {user_id}"),
        email: format!("{user_id}@example.com"),
    }
}

/// Request with an optional bearer session token and no body.
pub(crate) fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request built")
}

/// JSON request with an optional bearer session token.
pub(crate) fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request built")
}

pub(crate) enum FormPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
}

/// Multipart form body matching what a browser form submit produces.
pub(crate) fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Multipart request with an optional bearer session token.
pub(crate) fn multipart_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    parts: &[FormPart<'_>],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(multipart_body(parts)))
        .expect("request built")
}
