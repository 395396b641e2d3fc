//! SQLite-based schema document cache.
//!
//! Stores dumped [`MSchema`] documents so repeated renders of the same
//! database skip introspection. The default location is
//! `~/.mschema/cache.db`.
//!
//! # Design
//!
//! - Simple key-value store with JSON values
//! - Keys are content hashes of a [`CacheKey`]; a changed source file
//!   (different modification time) or different build options miss
//! - Versioned - auto-clears on version mismatch

mod hash;
pub use hash::compute_hash;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::model::MSchema;

/// Current cache schema version. Bump this when the document format changes.
const CACHE_VERSION: i32 = 1;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cached document is invalid: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to determine cache directory")]
    NoCacheDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Identity of a cached document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Canonical path (or other identifier) of the source database.
    pub source: String,
    /// Source modification time in seconds since the epoch, if known.
    pub modified: Option<u64>,
    pub db_id: String,
    pub namespace: Option<String>,
    pub sample_limit: usize,
}

impl CacheKey {
    /// Hash used as the storage key.
    pub fn digest(&self) -> CacheResult<String> {
        Ok(compute_hash(self)?)
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: usize,
}

/// SQLite-based document cache.
pub struct SchemaCache {
    conn: Connection,
}

impl SchemaCache {
    /// Open or create the cache at the default location.
    pub fn open_default() -> CacheResult<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open or create the cache database at `path`.
    ///
    /// If the stored version doesn't match, the cache is cleared.
    pub fn open<P: AsRef<Path>>(path: P) -> CacheResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.init()?;

        Ok(cache)
    }

    /// Open an in-memory cache (for testing).
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.init()?;
        Ok(cache)
    }

    /// Get the default path of the cache database.
    pub fn default_path() -> CacheResult<PathBuf> {
        let base = dirs::home_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(base.join(".mschema").join("cache.db"))
    }

    fn init(&self) -> CacheResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        let stored_version: Option<i32> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                let s: String = row.get(0)?;
                Ok(s.parse().unwrap_or(0))
            })
            .optional()?;

        match stored_version {
            Some(v) if v == CACHE_VERSION => {}
            Some(v) => {
                tracing::info!(stored = v, current = CACHE_VERSION, "cache version changed, clearing");
                self.clear_all()?;
                self.set_version()?;
            }
            None => self.set_version()?,
        }

        Ok(())
    }

    fn set_version(&self) -> CacheResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
            params![CACHE_VERSION.to_string()],
        )?;
        Ok(())
    }

    /// Load a cached schema.
    pub fn get(&self, key: &CacheKey) -> CacheResult<Option<MSchema>> {
        let digest = key.digest()?;
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?",
                params![digest],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => {
                tracing::debug!(source = %key.source, "schema cache hit");
                Ok(Some(MSchema::from_json_str(&s)?))
            }
            None => Ok(None),
        }
    }

    /// Store a schema, replacing any earlier entry for the same key.
    pub fn put(&self, key: &CacheKey, schema: &MSchema) -> CacheResult<()> {
        let json = serde_json::to_string(&schema.dump()?)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO documents (key, source, value) VALUES (?, ?, ?)",
            params![key.digest()?, key.source, json],
        )?;
        Ok(())
    }

    /// Delete the entry for a key.
    pub fn delete(&self, key: &CacheKey) -> CacheResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM documents WHERE key = ?", params![key.digest()?])?;
        Ok(rows > 0)
    }

    /// Delete every entry built from `source`, whatever its options.
    pub fn clear_source(&self, source: &str) -> CacheResult<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM documents WHERE source = ?", params![source])?;
        Ok(rows)
    }

    /// Clear all entries (but keep metadata).
    pub fn clear_all(&self) -> CacheResult<()> {
        self.conn.execute("DELETE FROM documents", [])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheResult<CacheStats> {
        let entry_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;

        let total_size: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(value)), 0) FROM documents",
            [],
            |row| row.get(0),
        )?;

        Ok(CacheStats {
            entry_count: entry_count as usize,
            total_size_bytes: total_size as usize,
        })
    }
}
