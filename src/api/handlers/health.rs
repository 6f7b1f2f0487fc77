use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::Connection;
use tracing::{debug, error, info_span, Instrument};
use utoipa::ToSchema;

use crate::{api::state::AppState, identity::IdentityProvider, GIT_COMMIT_HASH};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
    identity_provider: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database and identity provider are healthy", body = Health),
        (status = 503, description = "Database or identity provider is unhealthy", body = Health)
    ),
    tag = "health"
)]
pub async fn health(state: Extension<Arc<AppState>>) -> impl IntoResponse {
    let database = match &state.database {
        Some(pool) => {
            let acquire_span = info_span!(
                "db.acquire",
                db.system = "postgresql",
                db.operation = "ACQUIRE"
            );
            match pool.acquire().instrument(acquire_span).await {
                Ok(mut conn) => {
                    let ping_span =
                        info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
                    match conn.ping().instrument(ping_span).await {
                        Ok(()) => "ok",
                        Err(error) => {
                            error!("Failed to ping database: {}", error);
                            "error"
                        }
                    }
                }
                Err(error) => {
                    error!("Failed to acquire database connection: {}", error);
                    "error"
                }
            }
        }
        // Memory-backed runs have no pool to ping.
        None => "memory",
    };

    let identity_provider = if state.identity.healthy().await {
        "ok"
    } else {
        "error"
    };

    let is_healthy = database != "error" && identity_provider != "error";

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        identity_provider: identity_provider.to_string(),
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    match format!("{}:{}:{}", health.name, health.version, short_hash).parse::<HeaderValue>() {
        Ok(x_app) => {
            headers.insert("X-App", x_app);
        }
        Err(err) => {
            error!("Failed to parse X-App header: {}", err);
        }
    }

    debug!(database, identity_provider, "health probed");

    let status = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, headers, Json(health))
}
