//! Namespace trait definition.
//!
//! Defines the host namespace interface the command handlers consume,
//! enabling pluggable backends (a live shell, `SQLite`, or memory).

use crate::core::Value;
use crate::error::Result;
use serde::Serialize;

/// Mapping from identifier to value, owned by the host shell.
pub trait Namespace {
    /// Looks up a variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, name: &str) -> Result<Option<Value>>;

    /// Creates or replaces a variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot store the value.
    fn set(&mut self, name: &str, value: Value) -> Result<()>;

    /// Removes a variable. Returns `true` if it existed.
    ///
    /// Never decodes the stored value, so unreadable entries can still be
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, name: &str) -> Result<bool>;

    /// Lists variable names in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn names(&self) -> Result<Vec<String>>;

    /// Looks up a variable, falling back to `default` when it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_or(&self, name: &str, default: Value) -> Result<Value> {
        Ok(self.get(name)?.unwrap_or(default))
    }
}

/// Namespace statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamespaceStats {
    /// Number of variables stored.
    pub variable_count: usize,
    /// Total size of stored payloads in bytes.
    pub total_payload_size: usize,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}
