//! Common error types for the music library

use thiserror::Error;

/// Common result type for music library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the persistence, enrichment and request layers
#[derive(Error, Debug)]
pub enum Error {
    /// Database connectivity, constraint or query failure (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No matching record, or an empty result where one was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// A song with the same (group, song) pair is already stored
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed or missing request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lyrics lookup service failed, timed out or returned a malformed body
    #[error("External API error: {0}")]
    ExternalApi(String),
}
