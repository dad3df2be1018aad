//! LitLite: an excerpt library for a public literary archive
//!
//! This crate scrapes author and work rosters from the archive, extracts the
//! plain text of each work, keeps a short excerpt as a stand-in summary in a
//! SQLite store, and renders the store as a static browsable website.

pub mod config;
pub mod output;
pub mod scrape;
pub mod storage;
pub mod summarize;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

pub use scrape::FetchError;

/// Main error type for LitLite operations
#[derive(Debug, Error)]
pub enum LitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Extracted text from {url} is too short ({length} < {minimum} chars)")]
    ExtractionTooShort {
        url: String,
        length: usize,
        minimum: usize,
    },

    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Store(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store not found at {}; run `litlite init` first", path.display())]
    StoreMissing { path: PathBuf },

    #[error("Nothing to process: {0}")]
    EmptyInput(String),

    #[error("URL parse error: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid link pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for LitLite operations
pub type Result<T> = std::result::Result<T, LitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{generate_site, sanitize_filename, SiteReport, Template};
pub use scrape::{Pipeline, RosterEntry, RunReport};
pub use storage::{NewWork, SqliteStorage, Storage, WorkRecord};
pub use summarize::{ExcerptTruncation, Summarizer};
