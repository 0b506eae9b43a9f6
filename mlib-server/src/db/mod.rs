//! Persistence layer
//!
//! Parameterized SQL over `song_info` and `song_text`. Single-statement
//! operations accept any executor (pool, connection or transaction); the
//! multi-statement ones open their own transaction on the pool.

pub mod lyrics;
pub mod songs;

pub use lyrics::{append_lyric_line, list_lyric_lines, replace_lyric_lines};
pub use songs::{
    create_song, create_song_info, delete_song, find_song_id, list_songs, song_exists,
    update_song, update_song_fields,
};

use mlib_common::Error;

pub(crate) fn song_not_found(group: &str, song: &str) -> Error {
    Error::NotFound(format!("Song not found: {} - {}", group, song))
}
