//! Liveness and store reachability

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: &'static str,
    /// "reachable" or "unreachable"
    pub database: &'static str,
    pub version: &'static str,
    /// Short git hash stamped by the build script
    pub build: &'static str,
}

/// GET /health
///
/// 200 while the song store answers a trivial query, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION");
    let build = env!("GIT_HASH");

    match state.songs.check_store().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "reachable",
                version,
                build,
            }),
        ),
        Err(e) => {
            warn!("Health check: song store unreachable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unreachable",
                    version,
                    build,
                }),
            )
        }
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
