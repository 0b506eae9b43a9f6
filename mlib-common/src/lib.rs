//! # Music Library Common Library
//!
//! Shared code for the music library service including:
//! - Error taxonomy (`Error`, `Result`)
//! - Configuration loading (TOML file, environment, CLI overrides)
//! - Database bootstrap, schema migrations and shared models

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
