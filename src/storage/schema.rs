//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the LitLite store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per ingested work; duplicates are allowed
CREATE TABLE IF NOT EXISTS summaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    summary TEXT NOT NULL,
    source_url TEXT,
    year INTEGER,
    genre TEXT,
    length TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_title ON summaries(title);
CREATE INDEX IF NOT EXISTS idx_author ON summaries(author);
CREATE INDEX IF NOT EXISTS idx_genre ON summaries(genre);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS summary_tags (
    summary_id INTEGER NOT NULL REFERENCES summaries(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (summary_id, tag_id)
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize_schema(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_and_indexes_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for (kind, name) in [
            ("table", "summaries"),
            ("table", "tags"),
            ("table", "summary_tags"),
            ("index", "idx_title"),
            ("index", "idx_author"),
            ("index", "idx_genre"),
        ] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
                    [kind, name],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "{} {} should exist", kind, name);
        }
    }

    #[test]
    fn test_tag_names_unique() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute("INSERT INTO tags (name) VALUES ('友情')", [])
            .unwrap();
        let duplicate = conn.execute("INSERT INTO tags (name) VALUES ('友情')", []);
        assert!(duplicate.is_err());
    }
}
