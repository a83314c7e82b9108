//! Persistent key-value preference store backed by SQLite.
//!
//! Holds the cached session and the generated device id across restarts.
//! Writes are plain upserts: the last writer wins.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";

/// Preference store wrapper
pub struct PreferenceStore {
    conn: Mutex<Connection>,
}

impl PreferenceStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
            }
        }

        debug!(path = %path.display(), "Opening preference store");

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open preference store at {}", path.display()))?;

        let store = Self::with_connection(conn)?;
        info!(path = %path.display(), "Preference store ready");
        Ok(store)
    }

    /// Create a store that lives only for the lifetime of the process
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to create preference schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Preference store lock poisoned"))
    }

    /// Read a value
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read preference '{}'", key))
    }

    /// Read a value, treating a missing key as an empty string
    pub fn get_or_empty(&self, key: &str) -> Result<String> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Insert or replace a value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )
        .with_context(|| format!("Failed to write preference '{}'", key))?;
        debug!(key = key, "Preference stored");
        Ok(())
    }

    /// Delete a value; missing keys are ignored
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove preference '{}'", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key() -> Result<()> {
        let store = PreferenceStore::in_memory()?;
        assert_eq!(store.get("access_token")?, None);
        assert_eq!(store.get_or_empty("access_token")?, "");
        Ok(())
    }

    #[test]
    fn test_last_write_wins() -> Result<()> {
        let store = PreferenceStore::in_memory()?;
        store.set("user_id", "first")?;
        store.set("user_id", "second")?;
        assert_eq!(store.get("user_id")?.as_deref(), Some("second"));
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<()> {
        let store = PreferenceStore::in_memory()?;
        store.set("device_id", "0123456789abcdef")?;
        store.remove("device_id")?;
        store.remove("device_id")?;
        assert_eq!(store.get("device_id")?, None);
        Ok(())
    }

    #[test]
    fn test_persists_across_reopen() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("prefs.db");

        {
            let store = PreferenceStore::open(&path)?;
            store.set("access_token", "tok")?;
        }

        assert!(path.exists());
        let store = PreferenceStore::open(&path)?;
        assert_eq!(store.get("access_token")?.as_deref(), Some("tok"));
        Ok(())
    }
}
