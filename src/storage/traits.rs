//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{NewWork, WorkRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Work not found: {0}")]
    WorkNotFound(i64),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Covers everything the pipeline, the site generator and the CLI need
/// from the store.
pub trait Storage {
    // ===== Works =====

    /// Inserts one work and its tags in a single transaction
    ///
    /// # Returns
    ///
    /// The id assigned to the new row
    fn insert_work(&mut self, work: &NewWork) -> StorageResult<i64>;

    /// Inserts a batch of works in a single transaction
    ///
    /// Either every work in the batch is committed or none is.
    ///
    /// # Returns
    ///
    /// The ids assigned, in input order
    fn insert_works(&mut self, works: &[NewWork]) -> StorageResult<Vec<i64>>;

    /// Gets a work by id, including its tags
    fn get_work(&self, id: i64) -> StorageResult<WorkRecord>;

    /// Lists every work ordered by author, year (unknown last) and id
    fn list_works(&self) -> StorageResult<Vec<WorkRecord>>;

    /// Deletes a work; its tag associations cascade
    fn delete_work(&mut self, id: i64) -> StorageResult<()>;

    // ===== Tags =====

    /// Gets the tag names attached to a work, in tag creation order
    fn tags_for_work(&self, id: i64) -> StorageResult<Vec<String>>;

    // ===== Statistics =====

    /// Counts all works
    fn count_works(&self) -> StorageResult<u64>;

    /// Counts distinct authors
    fn count_authors(&self) -> StorageResult<u64>;

    /// Counts distinct non-null genres
    fn count_genres(&self) -> StorageResult<u64>;

    /// Counts tags
    fn count_tags(&self) -> StorageResult<u64>;
}
