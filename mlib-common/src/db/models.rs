//! Database models

use serde::{Deserialize, Serialize};

/// Song metadata row (`song_info`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: i64,
    pub group: String,
    pub song: String,
    /// ISO `YYYY-MM-DD`
    pub release_date: Option<String>,
    pub link: Option<String>,
}

/// Optional filters for song listing
///
/// Every field is independent; only the ones set constrain the query, and
/// they are AND-combined. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub group: Option<String>,
    pub song: Option<String>,
    pub link: Option<String>,
    pub release_date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SongFilter {
    pub fn is_empty(&self) -> bool {
        self == &SongFilter::default()
    }
}

/// Details returned by the external lyrics lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDetails {
    /// Normalized to ISO `YYYY-MM-DD`
    pub release_date: Option<String>,
    pub text: String,
    pub link: Option<String>,
}

/// Partial update of one song identified by (group, song)
///
/// `None` fields are left untouched; an empty `lines` keeps the current lyrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongUpdate {
    pub group: String,
    pub song: String,
    pub release_date: Option<String>,
    pub link: Option<String>,
    pub lines: Vec<String>,
}

/// Drop empty strings so absent and blank inputs mean the same thing
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
