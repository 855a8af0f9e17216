//! SQLite-backed local state.
//!
//! Provides persistent storage for:
//! - The notification badge counter
//! - The last successfully fetched reminder list (stale fallback)
//! - A generic key-value store for application state
//!
//! Tokens never live here; they are kept in the OS keyring.

use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::{DatabaseError, Result};
use crate::reminder::Reminder;

const NOTIFICATION_COUNT_KEY: &str = "notification_count";
const CACHED_REMINDERS_KEY: &str = "cached_reminders";

/// SQLite database for local client state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/merohealth/merohealth.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = super::data_dir()?.join("merohealth.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path. Used by tests to isolate
    /// state in a temporary directory.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(DatabaseError::from)?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e).into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Current notification badge count.
    pub fn notification_count(&self) -> Result<u64> {
        Ok(self
            .kv_get(NOTIFICATION_COUNT_KEY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    /// Bump the badge count by one. Called when a reminder is surfaced.
    pub fn increment_notification_count(&self) -> Result<u64> {
        let next = self.notification_count()? + 1;
        self.kv_set(NOTIFICATION_COUNT_KEY, &next.to_string())?;
        Ok(next)
    }

    /// Reset the badge count, e.g. after the user views the reminder list.
    pub fn reset_notification_count(&self) -> Result<()> {
        self.kv_set(NOTIFICATION_COUNT_KEY, "0")
    }

    /// Replace the cached reminder list with the latest fetch result.
    pub fn cache_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        let json = serde_json::to_string(reminders)?;
        self.kv_set(CACHED_REMINDERS_KEY, &json)
    }

    /// Last successfully fetched reminder list, if any. A corrupt cache
    /// entry is treated as absent.
    pub fn cached_reminders(&self) -> Result<Option<Vec<Reminder>>> {
        Ok(self
            .kv_get(CACHED_REMINDERS_KEY)?
            .and_then(|json| serde_json::from_str(&json).ok()))
    }
}
