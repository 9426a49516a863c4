//! SQLite-backed key-value store.
//!
//! One row per logical collection; the value column holds the collection
//! serialized as JSON. A missing key reads as the type's default, and so
//! does a value that no longer parses (with a warning).

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::data_dir;
use crate::error::StoreError;

/// Keys of the persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    User,
    Stats,
    Todos,
    Calendar,
    History,
    Distractions,
    Settings,
    Coupons,
}

impl StoreKey {
    pub const ALL: [StoreKey; 8] = [
        StoreKey::User,
        StoreKey::Stats,
        StoreKey::Todos,
        StoreKey::Calendar,
        StoreKey::History,
        StoreKey::Distractions,
        StoreKey::Settings,
        StoreKey::Coupons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::User => "user",
            StoreKey::Stats => "stats",
            StoreKey::Todos => "todos",
            StoreKey::Calendar => "calendar",
            StoreKey::History => "history",
            StoreKey::Distractions => "distractions",
            StoreKey::Settings => "settings",
            StoreKey::Coupons => "coupons",
        }
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `<data_dir>/flowgenix.db`, creating it if needed.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(&data_dir()?.join("flowgenix.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory store. Nothing survives the process.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn get_raw(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key.as_str()], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_raw(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    /// Read a collection. Absent or unreadable values yield `T::default()`.
    pub fn load<T: DeserializeOwned + Default>(&self, key: StoreKey) -> Result<T, StoreError> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key = key.as_str(), error = %e, "stored value is corrupted; using defaults");
                Ok(T::default())
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StoreError::QueryFailed(format!("serialize {}: {e}", key.as_str())))?;
        self.set_raw(key, &json)
    }
}
