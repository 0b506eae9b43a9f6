//! Enrichment client and request orchestration

pub mod lyrics_client;
pub mod song_service;

pub use lyrics_client::{LyricsApiClient, LyricsProvider};
pub use song_service::{split_lyrics, validate_release_date, CreatedSong, SongService};
