//! HTTP surface: router assembly and server wiring.

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{delete, get, patch, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    assets::HttpAssetStore,
    cli::globals::RemoteService,
    identity::HttpIdentityProvider,
    store::{PostgresMemberStore, PostgresWorkspaceStore},
    sync::WorkspaceLocks,
};

pub mod error;
pub mod handlers;
mod openapi;
pub mod state;

pub use openapi::openapi;
pub use state::AppState;

use handlers::{health, members, root, workspaces};

/// Build the API router over the given state.
///
/// The router carries no middleware so tests can drive it directly; `new`
/// adds the request-id, tracing, and CORS layers for the real server.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route(
            "/v1/workspaces",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route(
            "/v1/workspaces/:workspace_id",
            patch(workspaces::update_workspace).delete(workspaces::delete_workspace),
        )
        .route(
            "/v1/workspaces/:workspace_id/reset-invite-code",
            post(workspaces::reset_invite_code),
        )
        .route(
            "/v1/workspaces/:workspace_id/join",
            post(workspaces::join_workspace),
        )
        .route("/v1/members", get(members::list_members))
        .route(
            "/v1/members/:member_id",
            delete(members::remove_member).patch(members::update_member_role),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .layer(Extension(state))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    dsn: String,
    identity: RemoteService,
    assets: RemoteService,
    frontend_url: &str,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let identity_provider = HttpIdentityProvider::new(&identity.url, identity.token)
        .context("Failed to build identity provider client")?;
    let asset_store = HttpAssetStore::new(&assets.url, assets.token)
        .context("Failed to build asset store client")?;

    let app_state = Arc::new(AppState {
        workspaces: Arc::new(PostgresWorkspaceStore::new(pool.clone())),
        members: Arc::new(PostgresMemberStore::new(pool.clone())),
        identity: Arc::new(identity_provider),
        assets: Arc::new(asset_store),
        locks: WorkspaceLocks::default(),
        database: Some(pool),
    });

    let frontend_origin = frontend_origin(frontend_url)?;
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_origin(AllowOrigin::exact(frontend_origin))
        .allow_credentials(true);

    let app = router(app_state).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &Request<Body>| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;
    let host = parsed.host_str().ok_or_else(|| {
        anyhow!("Frontend base URL must include a valid host: {frontend_base_url}")
    })?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}
