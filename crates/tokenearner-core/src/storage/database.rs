//! SQLite-backed key-value slot.
//!
//! Stores each key as one row of a `kv` table; `INSERT OR REPLACE` makes
//! every write atomic.

use std::path::Path;

use rusqlite::{params, Connection};

use super::slot::Slot;
use crate::error::StorageError;

pub struct SqliteSlot {
    conn: Connection,
}

impl SqliteSlot {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let slot = Self { conn };
        slot.migrate()?;
        Ok(slot)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let slot = Self { conn };
        slot.migrate()?;
        Ok(slot)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }
}

impl Slot for SqliteSlot {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let slot = SqliteSlot::open_memory().unwrap();
        assert_eq!(slot.read("absent").unwrap(), None);
    }

    #[test]
    fn write_replaces_previous_value() {
        let mut slot = SqliteSlot::open_memory().unwrap();
        slot.write("k", "one").unwrap();
        slot.write("k", "two").unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn reopening_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let mut slot = SqliteSlot::open(&path).unwrap();
            slot.write("k", "persisted").unwrap();
        }
        let slot = SqliteSlot::open(&path).unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("persisted"));
    }
}
