//! # replclip
//!
//! Clipboard commands for an interactive shell session.
//!
//! replclip provides two shell commands and the validators behind them:
//!
//! - **copy**: puts a cached input or output line (`_i7`, `_7`, `7`, `_`)
//!   on the clipboard
//! - **serialize**: sends a variable to the clipboard as an escaped byte
//!   string literal (`b'\x80\x01...'`), or reads such a literal back into
//!   the namespace
//!
//! ## Features
//!
//! - **Validators**: line-number and identifier checks with shell-style errors
//! - **`SQLite` Namespace**: variables persist between invocations
//! - **Clipboard Backends**: system clipboard, plain file, or in-memory
//! - **Depth Guard**: deeply nested payloads are rejected in both directions

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod clipboard;
pub mod codec;
pub mod core;
pub mod error;
pub mod magic;
pub mod namespace;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Value, valid_identifier, valid_line_number};

// Re-export namespace types
pub use namespace::{DEFAULT_DB_PATH, MemoryNamespace, Namespace, SqliteNamespace};

// Re-export clipboard types
pub use clipboard::{Clipboard, FileClipboard, MemoryClipboard, SystemClipboard};

// Re-export shell command types
pub use magic::{MagicCommand, SerializeOutcome, Session, parse_line};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
