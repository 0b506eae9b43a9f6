//! Song endpoints
//!
//! - `POST /create-song`: create a song, enriched by the lyrics service
//! - `GET /song`: paged lyric lines of one song
//! - `PUT /song`: partial update of fields and lyrics
//! - `DELETE /song`: delete one song
//! - `GET /songs`: filtered, paged song list

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use mlib_common::db::{non_empty, SongFilter, SongRecord, SongUpdate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::pagination::Page;
use crate::services::split_lyrics;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    pub group: String,
    pub song: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSongResponse {
    pub id: i64,
    pub group: String,
    pub song: String,
}

/// Query parameters for `GET /song`
///
/// Pagination values stay raw strings so bad input gets our own 400 message.
#[derive(Debug, Deserialize)]
pub struct SongTextQuery {
    pub group: Option<String>,
    pub song: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SongTextResponse {
    pub group: String,
    pub song: String,
    pub text: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub group: String,
    pub song: String,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Full replacement lyrics; split into lines like enrichment text
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SongKeyQuery {
    pub group: Option<String>,
    pub song: Option<String>,
}

/// Query parameters for `GET /songs`
#[derive(Debug, Deserialize)]
pub struct ListSongsQuery {
    pub group: Option<String>,
    pub song: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListSongsQuery {
    fn filter(&self) -> SongFilter {
        SongFilter {
            group: non_empty(self.group.clone()),
            song: non_empty(self.song.clone()),
            link: non_empty(self.link.clone()),
            release_date: non_empty(self.release_date.clone()),
            start_date: non_empty(self.start_date.clone()),
            end_date: non_empty(self.end_date.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /create-song
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateSongResponse>)> {
    let Json(request) = payload?;
    debug!(group = %request.group, song = %request.song, "Create song request");

    let created = state
        .songs
        .create_song(&request.group, &request.song)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSongResponse {
            id: created.id,
            group: created.group,
            song: created.song,
        }),
    ))
}

/// GET /song?group=&song=&limit=&offset=
pub async fn get_song_text(
    State(state): State<AppState>,
    query: Result<Query<SongTextQuery>, QueryRejection>,
) -> ApiResult<Json<SongTextResponse>> {
    let Query(query) = query?;
    let page = Page::parse(query.limit.as_deref(), query.offset.as_deref())?;

    let group = query.group.unwrap_or_default();
    let song = query.song.unwrap_or_default();
    debug!(group = %group, song = %song, limit = page.limit, offset = page.offset, "Song text request");

    let text = state.songs.song_text(&group, &song, page).await?;

    Ok(Json(SongTextResponse { group, song, text }))
}

/// PUT /song
pub async fn update_song(
    State(state): State<AppState>,
    payload: Result<Json<UpdateSongRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(request) = payload?;
    debug!(group = %request.group, song = %request.song, "Update song request");

    let update = SongUpdate {
        group: request.group,
        song: request.song,
        release_date: non_empty(request.release_date),
        link: non_empty(request.link),
        lines: request.text.as_deref().map(split_lyrics).unwrap_or_default(),
    };

    state.songs.update_song(&update).await?;

    Ok(MessageResponse::new("Song updated successfully"))
}

/// DELETE /song?group=&song=
pub async fn delete_song(
    State(state): State<AppState>,
    query: Result<Query<SongKeyQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = query?;
    let group = query.group.unwrap_or_default();
    let song = query.song.unwrap_or_default();
    debug!(group = %group, song = %song, "Delete song request");

    state.songs.delete_song(&group, &song).await?;

    Ok(MessageResponse::new("Song deleted successfully"))
}

/// GET /songs with optional filters and pagination
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<ListSongsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SongRecord>>> {
    let Query(query) = query?;
    let page = Page::parse(query.limit.as_deref(), query.offset.as_deref())?;
    let filter = query.filter();
    debug!(?filter, limit = page.limit, offset = page.offset, "List songs request");

    let songs = state.songs.list_songs(&filter, page).await?;

    Ok(Json(songs))
}
