//! HTTP API handlers

pub mod health;
pub mod songs;

pub use health::health_routes;
pub use songs::{create_song, delete_song, get_song_text, list_songs, update_song};
