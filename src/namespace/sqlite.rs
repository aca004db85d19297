//! `SQLite` namespace implementation.
//!
//! Persists namespace variables between invocations of the standalone
//! binary. Values are stored in the same payload format used on the
//! clipboard.

// SQLite stores all integers as i64. These casts are intentional and safe
// because we only store non-negative values that fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::codec::payload;
use crate::core::Value;
use crate::error::{Result, StorageError};
use crate::namespace::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::namespace::{Namespace, NamespaceStats};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// SQLite-based namespace.
///
/// # Examples
///
/// ```no_run
/// use replclip::namespace::{Namespace, SqliteNamespace};
///
/// let mut ns = SqliteNamespace::open(".replclip/namespace.db").unwrap();
/// ns.init().unwrap();
/// ns.set("x", 1i64.into()).unwrap();
/// ```
pub struct SqliteNamespace {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteNamespace {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Database(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        // Use WAL mode for better concurrent access (returns result, use query_row)
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        tracing::debug!(path = %path.display(), "opened namespace database");

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates the schema. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn init(&mut self) -> Result<()> {
        if !self.is_initialized()? {
            self.conn
                .execute_batch(SCHEMA_SQL)
                .map_err(StorageError::from)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        }
        Ok(())
    }

    /// Checks if the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    pub fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    /// Deletes every variable, preserving the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub fn reset(&mut self) -> Result<()> {
        self.conn
            .execute("DELETE FROM variables", [])
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Gathers namespace statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics cannot be gathered.
    pub fn stats(&self) -> Result<NamespaceStats> {
        let (count, total_size): (i64, i64) = self
            .conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(LENGTH(payload)), 0) FROM variables",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(StorageError::from)?;

        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(NamespaceStats {
            variable_count: count as usize,
            total_payload_size: total_size as usize,
            schema_version,
            db_size,
        })
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn decode(name: &str, blob: &[u8]) -> Result<Value> {
        payload::loads(blob).map_err(|e| {
            StorageError::Corrupt {
                name: name.to_string(),
                reason: e.detail(),
            }
            .into()
        })
    }

    /// Returns current Unix timestamp.
    #[allow(clippy::cast_possible_wrap)]
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl Namespace for SqliteNamespace {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM variables WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)?;

        blob.map(|b| Self::decode(name, &b)).transpose()
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let blob = payload::dumps(&value)?;
        let now = Self::now();

        self.conn
            .execute(
                r"
            INSERT INTO variables (name, payload, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(name) DO UPDATE SET payload = excluded.payload,
                                            updated_at = excluded.updated_at
        ",
                params![name, blob, now],
            )
            .map_err(StorageError::from)?;

        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM variables WHERE name = ?", params![name])
            .map_err(StorageError::from)?;
        Ok(deleted > 0)
    }

    fn names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM variables ORDER BY name")
            .map_err(StorageError::from)?;

        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(StorageError::from)?;

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, SerializeError};

    fn setup() -> SqliteNamespace {
        let mut ns = SqliteNamespace::in_memory().unwrap();
        ns.init().unwrap();
        ns
    }

    #[test]
    fn test_init() {
        let mut ns = SqliteNamespace::in_memory().unwrap();
        assert!(!ns.is_initialized().unwrap());
        assert!(ns.init().is_ok());
        assert!(ns.is_initialized().unwrap());
    }

    #[test]
    fn test_init_idempotent() {
        let mut ns = SqliteNamespace::in_memory().unwrap();
        assert!(ns.init().is_ok());
        assert!(ns.init().is_ok());
    }

    #[test]
    fn test_variable_crud() {
        let mut ns = setup();
        assert!(ns.get("x").unwrap().is_none());

        ns.set("x", vec![1i64, 2].into()).unwrap();
        assert_eq!(ns.get("x").unwrap(), Some(vec![1i64, 2].into()));

        ns.set("x", "replaced".into()).unwrap();
        assert_eq!(ns.get("x").unwrap(), Some("replaced".into()));

        ns.set("a", Value::Null).unwrap();
        assert_eq!(ns.names().unwrap(), vec!["a", "x"]);

        assert!(ns.remove("x").unwrap());
        assert!(!ns.remove("x").unwrap());
        assert_eq!(ns.names().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_set_rejects_opaque() {
        let mut ns = setup();
        let err = ns.set("h", Value::opaque("handle")).unwrap_err();
        assert!(matches!(
            err,
            Error::Serialize(SerializeError::NotSerializable { .. })
        ));
        assert!(ns.get("h").unwrap().is_none());
    }

    #[test]
    fn test_reset_and_stats() {
        let mut ns = setup();
        ns.set("a", 1i64.into()).unwrap();
        ns.set("b", "two".into()).unwrap();

        let stats = ns.stats().unwrap();
        assert_eq!(stats.variable_count, 2);
        assert!(stats.total_payload_size > 0);
        assert_eq!(stats.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(stats.db_size.is_none());

        ns.reset().unwrap();
        assert_eq!(ns.stats().unwrap().variable_count, 0);
        assert!(ns.is_initialized().unwrap());
    }

    fn insert_corrupt(ns: &SqliteNamespace, name: &str) {
        ns.conn
            .execute(
                "INSERT INTO variables (name, payload, created_at, updated_at) VALUES (?, x'00', 0, 0)",
                params![name],
            )
            .unwrap();
    }

    #[test]
    fn test_corrupt_payload() {
        let ns = setup();
        insert_corrupt(&ns, "bad");
        let err = ns.get("bad").unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::Corrupt { .. })
        ));
        assert!(err.to_string().contains("corrupt variable 'bad'"));
        assert!(!err.to_string().contains("clipboard"));
    }

    #[test]
    fn test_remove_corrupt_payload() {
        let mut ns = setup();
        insert_corrupt(&ns, "bad");
        ns.set("good", 1i64.into()).unwrap();

        assert!(ns.remove("bad").unwrap());
        assert_eq!(ns.names().unwrap(), vec!["good"]);
        assert!(ns.get("bad").unwrap().is_none());
    }
}
