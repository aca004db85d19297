//! Namespace backends for replclip.
//!
//! The command handlers never reach for global state: they receive a
//! [`Namespace`] explicitly. [`MemoryNamespace`] suits embedding hosts and
//! tests; [`SqliteNamespace`] persists variables for the standalone binary.

pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryNamespace;
pub use schema::CURRENT_SCHEMA_VERSION;
pub use sqlite::SqliteNamespace;
pub use traits::{Namespace, NamespaceStats};

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".replclip/namespace.db";
