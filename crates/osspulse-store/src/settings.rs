use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Settings database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key/value settings store backed by SQLite.
///
/// SQLite was chosen because it is a zero-config embedded database
/// that survives across sessions without a separate process. The
/// store itself is untyped; the typed FilterState mapping lives in
/// the core crate.
pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory store for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!("Saving setting {}", key);
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_is_none() {
        let store = SettingsStore::in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = SettingsStore::in_memory().unwrap();
        store.set("sortOrder", "popular").unwrap();
        assert_eq!(store.get("sortOrder").unwrap().as_deref(), Some("popular"));
    }

    #[test]
    fn test_set_overwrites() {
        let store = SettingsStore::in_memory().unwrap();
        store.set("tagLogic", "or").unwrap();
        store.set("tagLogic", "and").unwrap();
        assert_eq!(store.get("tagLogic").unwrap().as_deref(), Some("and"));
    }

    #[test]
    fn test_delete_removes_key() {
        let store = SettingsStore::in_memory().unwrap();
        store.set("viewMode", "list").unwrap();
        store.delete("viewMode").unwrap();
        assert_eq!(store.get("viewMode").unwrap(), None);
    }
}
