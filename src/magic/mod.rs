//! The `copy` and `serialize` shell commands.
//!
//! [`parse_line`] turns a command line into a [`MagicCommand`];
//! [`Session`] runs it against a namespace and a clipboard.

pub mod args;
pub mod session;

pub use args::{CopyArgs, MagicCommand, SerializeArgs, parse_line};
pub use session::{Session, SerializeOutcome};
