//! CLI layer for replclip.
//!
//! Provides the command-line interface using clap, with commands for
//! managing the persistent namespace and running the clipboard commands
//! against it.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
