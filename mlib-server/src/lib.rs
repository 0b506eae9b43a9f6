//! mlib-server library - song and lyrics HTTP service
//!
//! Exposes the router and its building blocks for the binary and for
//! integration tests.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod pagination;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use services::{LyricsProvider, SongService};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub songs: SongService,
}

impl AppState {
    pub fn new(db: SqlitePool, lyrics: Arc<dyn LyricsProvider>) -> Self {
        Self {
            songs: SongService::new(db, lyrics),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/create-song", post(api::create_song))
        .route(
            "/song",
            get(api::get_song_text)
                .put(api::update_song)
                .delete(api::delete_song),
        )
        .route("/songs", get(api::list_songs))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
