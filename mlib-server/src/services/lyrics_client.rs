//! Lyrics lookup client
//!
//! Fetches release date, lyrics text and link for a (group, song) pair from
//! the external lyrics service.
//!
//! # API Reference
//! - Endpoint: `GET {base_url}/info?group=<group>&song=<song>`
//! - Response: `{"releaseDate": "16.07.2006", "text": "...", "link": "..."}`
//!
//! One attempt per call: transport errors, timeouts, non-success statuses and
//! malformed bodies all surface as [`Error::ExternalApi`].

use async_trait::async_trait;
use chrono::NaiveDate;
use mlib_common::config::LyricsApiConfig;
use mlib_common::db::{non_empty, SongDetails};
use mlib_common::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Source of song details used when a song is created
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    async fn fetch_song_details(&self, group: &str, song: &str) -> Result<SongDetails>;
}

/// Response body of the lyrics service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongDetailResponse {
    #[serde(default)]
    release_date: Option<String>,
    text: String,
    #[serde(default)]
    link: Option<String>,
}

/// HTTP client for the external lyrics service
#[derive(Debug, Clone)]
pub struct LyricsApiClient {
    http_client: Client,
    info_url: String,
}

impl LyricsApiClient {
    pub fn new(config: &LyricsApiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            info_url: format!("{}/info", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl LyricsProvider for LyricsApiClient {
    async fn fetch_song_details(&self, group: &str, song: &str) -> Result<SongDetails> {
        debug!(group = %group, song = %song, "Querying lyrics service");

        let response = self
            .http_client
            .get(&self.info_url)
            .query(&[("group", group), ("song", song)])
            .send()
            .await
            .map_err(|e| Error::ExternalApi(format!("Lyrics API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ExternalApi(format!(
                "Lyrics API returned error {}: {}",
                status, body
            )));
        }

        let detail: SongDetailResponse = response.json().await.map_err(|e| {
            Error::ExternalApi(format!("Failed to parse lyrics API response: {}", e))
        })?;

        Ok(SongDetails {
            release_date: normalize_release_date(non_empty(detail.release_date))?,
            text: detail.text,
            link: non_empty(detail.link),
        })
    }
}

/// Convert the service's release date to ISO `YYYY-MM-DD`
///
/// Accepts ISO dates as-is and the `DD.MM.YYYY` form the service emits.
pub fn normalize_release_date(raw: Option<String>) -> Result<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
        .map(|date| Some(date.format("%Y-%m-%d").to_string()))
        .map_err(|_| Error::ExternalApi(format!("Malformed release date: '{}'", raw)))
}
