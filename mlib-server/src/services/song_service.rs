//! Song request orchestration
//!
//! Validates requests before any side effect, calls the lyrics service for
//! new songs and delegates storage to [`crate::db`]. Empty lookups are
//! reported as `NotFound`.

use chrono::NaiveDate;
use mlib_common::db::{SongFilter, SongRecord, SongUpdate};
use mlib_common::{Error, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

use super::lyrics_client::LyricsProvider;
use crate::db;
use crate::pagination::Page;

/// Song stored by [`SongService::create_song`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSong {
    pub id: i64,
    pub group: String,
    pub song: String,
}

#[derive(Clone)]
pub struct SongService {
    db: SqlitePool,
    lyrics: Arc<dyn LyricsProvider>,
}

impl SongService {
    pub fn new(db: SqlitePool, lyrics: Arc<dyn LyricsProvider>) -> Self {
        Self { db, lyrics }
    }

    /// Look up details for a new song and store it with its lyric lines
    ///
    /// The record and its lines are written in one transaction, so a failed
    /// lookup or insert leaves nothing behind. A pair that is already stored
    /// is a `Conflict` and the lyrics service is not called.
    pub async fn create_song(&self, group: &str, song: &str) -> Result<CreatedSong> {
        require_identity(group, song)?;
        if db::song_exists(&self.db, group, song).await? {
            return Err(Error::Conflict(format!(
                "Song already exists: {} - {}",
                group, song
            )));
        }

        let details = self.lyrics.fetch_song_details(group, song).await?;
        let lines = split_lyrics(&details.text);

        let id = db::create_song(
            &self.db,
            group,
            song,
            details.release_date.as_deref(),
            details.link.as_deref(),
            &lines,
        )
        .await?;

        info!(id, group = %group, song = %song, lines = lines.len(), "Song saved");

        Ok(CreatedSong {
            id,
            group: group.to_string(),
            song: song.to_string(),
        })
    }

    /// One page of a song's lyric lines
    ///
    /// An unknown song and a page past the last line both yield `NotFound`.
    pub async fn song_text(&self, group: &str, song: &str, page: Page) -> Result<Vec<String>> {
        require_identity(group, song)?;

        let lines = db::list_lyric_lines(&self.db, group, song, page).await?;
        if lines.is_empty() {
            return Err(Error::NotFound("Song text not found".to_string()));
        }

        Ok(lines)
    }

    /// Round-trip to the store; used by the health endpoint
    pub async fn check_store(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    pub async fn song_exists(&self, group: &str, song: &str) -> Result<bool> {
        db::song_exists(&self.db, group, song).await
    }

    /// Apply a partial update after validating the release date
    pub async fn update_song(&self, update: &SongUpdate) -> Result<()> {
        require_identity(&update.group, &update.song)?;
        if let Some(release_date) = &update.release_date {
            validate_release_date(release_date)?;
        }

        db::update_song(&self.db, update).await?;
        info!(group = %update.group, song = %update.song, "Song data updated");

        Ok(())
    }

    pub async fn delete_song(&self, group: &str, song: &str) -> Result<()> {
        require_identity(group, song)?;

        db::delete_song(&self.db, group, song).await?;
        info!(group = %group, song = %song, "Song deleted");

        Ok(())
    }

    /// One page of songs matching `filter`; an empty page is `NotFound`
    pub async fn list_songs(&self, filter: &SongFilter, page: Page) -> Result<Vec<SongRecord>> {
        debug!(
            unfiltered = filter.is_empty(),
            limit = page.limit,
            offset = page.offset,
            "Listing songs"
        );

        let songs = db::list_songs(&self.db, filter, page).await?;
        if songs.is_empty() {
            return Err(Error::NotFound("No songs found".to_string()));
        }

        Ok(songs)
    }
}

fn require_identity(group: &str, song: &str) -> Result<()> {
    if group.trim().is_empty() || song.trim().is_empty() {
        return Err(Error::InvalidInput(
            "Missing required parameters: group or song".to_string(),
        ));
    }
    Ok(())
}

/// Accept only calendar dates written as `YYYY-MM-DD`
pub fn validate_release_date(date: &str) -> Result<()> {
    let well_formed = date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();
    if !well_formed {
        return Err(Error::InvalidInput(format!(
            "Invalid release date '{}', expected YYYY-MM-DD",
            date
        )));
    }
    Ok(())
}

/// Split lyrics text into stored lines
///
/// Breaks on `\n` (tolerating `\r\n`) and drops blank lines, so blank-line
/// verse separators do not become empty rows.
pub fn split_lyrics(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
