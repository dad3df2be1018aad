//! Storage module for persisting work summaries
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Work, tag and work-tag persistence
//! - The bundled sample data set
//! - Copying rows out of legacy-shaped stores

mod migrate;
mod sample;
mod schema;
mod sqlite;
mod traits;

pub use migrate::migrate_legacy;
pub use sample::{load_sample_data, sample_works};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::LitError;
use std::path::Path;

/// Opens an existing store, failing if the file does not exist
pub fn open_storage(path: &Path) -> Result<SqliteStorage, LitError> {
    SqliteStorage::open(path)
}

/// A persisted work summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub source_url: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    /// Length category, e.g. 長編 / 中編 / 短編
    pub length: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<String>,
}

/// A work summary ready to be inserted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWork {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub source_url: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub length: Option<String>,
    pub tags: Vec<String>,
}

impl NewWork {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }
}
