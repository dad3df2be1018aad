//! Legacy store migration
//!
//! Early stores only had `title, author, summary, source_url` columns.
//! Those rows are copied into a store with the current schema; the
//! metadata columns start out empty.

use crate::storage::traits::Storage;
use crate::storage::{NewWork, SqliteStorage};
use crate::LitError;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Copies every legacy row from `old` into the store at `new`
///
/// The old store is opened read-only and left untouched. The new store is
/// created if needed and all rows are inserted in one transaction.
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows copied
/// * `Err(LitError::StoreMissing)` - `old` does not exist
pub fn migrate_legacy(old: &Path, new: &Path) -> Result<usize, LitError> {
    if !old.is_file() {
        return Err(LitError::StoreMissing {
            path: old.to_path_buf(),
        });
    }

    let legacy = {
        let conn = Connection::open_with_flags(old, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare("SELECT title, author, summary, source_url FROM summaries")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(NewWork {
                    source_url: row.get(3)?,
                    ..NewWork::new(
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    )
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    let mut target = SqliteStorage::create(new)?;
    target.insert_works(&legacy)?;

    tracing::info!(
        "Migrated {} rows from {} to {}",
        legacy.len(),
        old.display(),
        new.display()
    );

    Ok(legacy.len())
}
