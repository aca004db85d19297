//! Command-line grammar for the shell commands.
//!
//! Parsed with clap derive; the token validators run as value parsers so a
//! malformed token fails at parse time.

use crate::core::token::{valid_identifier, valid_line_number};
use crate::error::{ArgumentError, CommandError, Error, Result};
use clap::{Args, Parser};

/// A shell command.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub enum MagicCommand {
    /// Copies an input or output line to the clipboard.
    ///
    /// `_i7` copies the input from line 7, `_7` and `7` copy its output.
    #[command(alias = "clip")]
    Copy(CopyArgs),

    /// Serializes a variable to the clipboard, or deserializes the clipboard
    /// and prints or stores the value.
    ///
    /// `serialize` prints the clipboard value, `serialize v` sends `v` to the
    /// clipboard, `serialize -o v` stores the clipboard value in `v`.
    #[command(alias = "pickle")]
    Serialize(SerializeArgs),
}

/// Arguments of `copy`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CopyArgs {
    /// The line number or cache variable to copy from.
    #[arg(default_value = "_", value_parser = valid_line_number)]
    pub line_number: String,
}

impl Default for CopyArgs {
    fn default() -> Self {
        Self {
            line_number: "_".to_string(),
        }
    }
}

/// Arguments of `serialize`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeArgs {
    /// The variable to store the deserialized value in.
    #[arg(short, long, value_name = "NAME", value_parser = valid_identifier)]
    pub output: Option<String>,

    /// The variable to serialize.
    #[arg(value_parser = valid_identifier)]
    pub var: Option<String>,
}

/// Parses one command line. Arguments are separated by whitespace.
///
/// # Examples
///
/// ```
/// use replclip::magic::{MagicCommand, parse_line};
///
/// let cmd = parse_line("copy 7").unwrap();
/// assert!(matches!(cmd, MagicCommand::Copy(args) if args.line_number == "7"));
/// ```
pub fn parse_line(line: &str) -> Result<MagicCommand> {
    MagicCommand::try_parse_from(line.split_whitespace()).map_err(parse_error)
}

/// Keeps validator failures as argument-format errors.
fn parse_error(err: clap::Error) -> Error {
    if let Some(arg_err) = std::error::Error::source(&err)
        .and_then(|source| source.downcast_ref::<ArgumentError>())
    {
        return arg_err.clone().into();
    }
    CommandError::from(err).into()
}
