//! Core domain models for replclip.
//!
//! Namespace values and the token validators shared by the command
//! handlers. These are pure domain models with no I/O dependencies.

pub mod token;
pub mod value;

pub use token::{normalize_line_number, valid_identifier, valid_line_number};
pub use value::Value;
