//! Storage layer for coursetrack.
//!
//! Section state lives in a flat string-to-string store that behaves like a
//! browser's local storage: keys are enumerable by index, and any call may
//! fail. The [`KeyValueStore`] trait is that capability; [`SqliteStore`]
//! persists it and [`MemoryStore`] keeps it in memory for tests and for
//! running without a database.

mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use memory::MemoryStore;

/// A string key-value store with index-based enumeration.
///
/// Every call may fail; callers decide whether a failure is fatal.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn len(&self) -> Result<usize>;

    /// Key at position `index`, or `None` past the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn key(&self, index: usize) -> Result<Option<String>>;

    /// Whether the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// All keys in index order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for index in 0..self.len()? {
            if let Some(key) = self.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        (**self).key(index)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// `SQLite`-backed store.
///
/// Entries keep the index of their first insertion; overwriting a key does
/// not move it to the end.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory `SQLite` store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_entries = self.len()?;

        let newest: Option<String> = self
            .conn
            .query_row("SELECT MAX(updated_at) FROM entries", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();

        let last_updated = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_entries,
            last_updated,
            db_size_bytes,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM entries WHERE key = ?1", [key])?;
        if affected > 0 {
            debug!("Removed {}", key);
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        let offset = i64::try_from(index).unwrap_or(i64::MAX);
        let key = self
            .conn
            .query_row(
                "SELECT key FROM entries ORDER BY id LIMIT 1 OFFSET ?1",
                [offset],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM entries ORDER BY id")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

/// Statistics about a `SQLite` store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of stored entries across all pages.
    pub total_entries: usize,
    /// When any entry was last written.
    pub last_updated: Option<DateTime<Utc>>,
    /// Size of the database file in bytes (0 for in-memory stores).
    pub db_size_bytes: u64,
}
