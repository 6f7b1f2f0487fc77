//! End-to-end test: boots the API on a real listener over in-memory backends
//! and drives the workspace/membership flow with an HTTP client.

use std::sync::Arc;

use anyhow::{Context, Result};
use laborejo::{
    api::{router, AppState},
    assets::MemoryAssetStore,
    identity::{MemoryIdentityProvider, User},
    store::{MemoryMemberStore, MemoryWorkspaceStore},
};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const BOUNDARY: &str = "laborejo-integration-boundary";

fn multipart_name_body(name: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

fn test_user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@example.com"),
    }
}

async fn start_server(identity: Arc<MemoryIdentityProvider>) -> Result<String> {
    let state = Arc::new(AppState::new(
        Arc::new(MemoryWorkspaceStore::default()),
        Arc::new(MemoryMemberStore::default()),
        identity,
        Arc::new(MemoryAssetStore::default()),
    ));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    let app = router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn server_exposes_health_and_banner() -> Result<()> {
    let base = start_server(Arc::new(MemoryIdentityProvider::default())).await?;
    let client = Client::new();

    let response = client.get(format!("{base}/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
    let health: Value = response.json().await?;
    assert_eq!(health["name"], "laborejo");
    assert_eq!(health["database"], "memory");
    assert_eq!(health["identity_provider"], "ok");

    let banner: Value = client.get(format!("{base}/")).send().await?.json().await?;
    assert_eq!(banner["name"], "laborejo");
    Ok(())
}

#[tokio::test]
async fn create_join_and_list_over_http() -> Result<()> {
    let identity = Arc::new(MemoryIdentityProvider::default());
    identity.insert_session("tok-alice", test_user("user-alice", "Alice"));
    identity.insert_session("tok-bob", test_user("user-bob", "Bob"));
    let base = start_server(identity).await?;
    let client = Client::new();

    // Unauthenticated requests bounce with the error envelope.
    let response = client
        .get(format!("{base}/v1/workspaces"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Unauthorized");

    // Alice creates a workspace.
    let response = client
        .post(format!("{base}/v1/workspaces"))
        .bearer_auth("tok-alice")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_name_body("Acme"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await?;
    let workspace_id = body["data"]["id"].as_str().context("workspace id")?.to_string();
    let invite_code = body["data"]["invite_code"]
        .as_str()
        .context("invite code")?
        .to_string();
    assert_eq!(invite_code.len(), 6);

    // Bob joins with the invite code.
    let response = client
        .post(format!("{base}/v1/workspaces/{workspace_id}/join"))
        .bearer_auth("tok-bob")
        .json(&json!({ "code": invite_code }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Both show up in the member listing, enriched with identity data.
    let response = client
        .get(format!("{base}/v1/members?workspace_id={workspace_id}"))
        .bearer_auth("tok-bob")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    let members = body["data"].as_array().context("members array")?;
    assert_eq!(members.len(), 2);
    let alice = members
        .iter()
        .find(|m| m["name"] == "Alice")
        .context("Alice listed")?;
    assert_eq!(alice["role"], "ADMIN");
    let bob = members
        .iter()
        .find(|m| m["name"] == "Bob")
        .context("Bob listed")?;
    assert_eq!(bob["role"], "MEMBER");

    // The workspace shows up in Bob's listing.
    let response = client
        .get(format!("{base}/v1/workspaces"))
        .bearer_auth("tok-bob")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["data"].as_array().context("workspaces array")?.len(), 1);
    assert_eq!(body["data"][0]["id"], workspace_id.as_str());

    Ok(())
}
