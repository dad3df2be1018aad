//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{NewWork, WorkRecord};
use crate::LitError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const WORK_COLUMNS: &str =
    "id, title, author, summary, source_url, year, genre, length, created_at, updated_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates the store file if needed and ensures the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(LitError)` - Failed to open database
    pub fn create(path: &Path) -> Result<Self, LitError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        configure(&conn)?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens an existing store
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Store opened, schema ensured
    /// * `Err(LitError::StoreMissing)` - No file at `path`
    pub fn open(path: &Path) -> Result<Self, LitError> {
        if !path.is_file() {
            return Err(LitError::StoreMissing {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open(path)?;
        configure(&conn)?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, LitError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn configure(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )
}

fn work_from_row(row: &Row<'_>) -> Result<WorkRecord, rusqlite::Error> {
    Ok(WorkRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        summary: row.get(3)?,
        source_url: row.get(4)?,
        year: row.get(5)?,
        genre: row.get(6)?,
        length: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        tags: Vec::new(),
    })
}

/// Inserts a work and links its tags on an open connection or transaction
fn insert_in(conn: &Connection, work: &NewWork, now: &str) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO summaries
            (title, author, summary, source_url, year, genre, length, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            work.title,
            work.author,
            work.summary,
            work.source_url,
            work.year,
            work.genre,
            work.length,
            now,
        ],
    )?;
    let summary_id = conn.last_insert_rowid();

    for tag in &work.tags {
        conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![tag])?;
        let tag_id: i64 =
            conn.query_row("SELECT id FROM tags WHERE name = ?1", params![tag], |row| {
                row.get(0)
            })?;
        conn.execute(
            "INSERT OR IGNORE INTO summary_tags (summary_id, tag_id) VALUES (?1, ?2)",
            params![summary_id, tag_id],
        )?;
    }

    Ok(summary_id)
}

/// Separates constraint failures from other SQLite errors
fn classify(err: rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(ffi, ref message)
            if ffi.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StorageError::ConstraintViolation(
                message.clone().unwrap_or_else(|| ffi.to_string()),
            )
        }
        other => StorageError::Sqlite(other),
    }
}

impl Storage for SqliteStorage {
    // ===== Works =====

    fn insert_work(&mut self, work: &NewWork) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let id = insert_in(&tx, work, &now).map_err(classify)?;
        tx.commit()?;
        Ok(id)
    }

    fn insert_works(&mut self, works: &[NewWork]) -> StorageResult<Vec<i64>> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let mut ids = Vec::with_capacity(works.len());
        for work in works {
            ids.push(insert_in(&tx, work, &now).map_err(classify)?);
        }

        tx.commit()?;
        Ok(ids)
    }

    fn get_work(&self, id: i64) -> StorageResult<WorkRecord> {
        let sql = format!("SELECT {} FROM summaries WHERE id = ?1", WORK_COLUMNS);
        let mut work = self
            .conn
            .query_row(&sql, params![id], work_from_row)
            .optional()?
            .ok_or(StorageError::WorkNotFound(id))?;

        work.tags = self.tags_for_work(id)?;
        Ok(work)
    }

    fn list_works(&self) -> StorageResult<Vec<WorkRecord>> {
        let sql = format!(
            "SELECT {} FROM summaries ORDER BY author, year IS NULL, year, id",
            WORK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut works = stmt
            .query_map([], work_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for work in &mut works {
            work.tags = self.tags_for_work(work.id)?;
        }

        Ok(works)
    }

    fn delete_work(&mut self, id: i64) -> StorageResult<()> {
        let affected = self
            .conn
            .execute("DELETE FROM summaries WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::WorkNotFound(id));
        }
        Ok(())
    }

    // ===== Tags =====

    fn tags_for_work(&self, id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name FROM tags t
             JOIN summary_tags st ON st.tag_id = t.id
             WHERE st.summary_id = ?1
             ORDER BY t.id",
        )?;

        let tags = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(tags)
    }

    // ===== Statistics =====

    fn count_works(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM summaries")
    }

    fn count_authors(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(DISTINCT author) FROM summaries")
    }

    fn count_genres(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(DISTINCT genre) FROM summaries")
    }

    fn count_tags(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM tags")
    }
}

fn count(conn: &Connection, sql: &str) -> StorageResult<u64> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n as u64)
}
