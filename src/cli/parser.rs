//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::core::token::valid_identifier;
use crate::magic::{CopyArgs, SerializeArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// replclip: copy cached shell lines and move variables through the
/// clipboard.
///
/// Variables live in a small `SQLite` namespace so that separate
/// invocations share them.
#[derive(Parser, Debug)]
#[command(name = "replclip")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the namespace database file.
    ///
    /// Defaults to `.replclip/namespace.db` in the current directory.
    #[arg(short, long, env = "REPLCLIP_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Use a plain file instead of the system clipboard.
    #[arg(long, env = "REPLCLIP_CLIPBOARD_FILE", global = true)]
    pub clipboard_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the namespace database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing variables).
        #[arg(short, long)]
        force: bool,
    },

    /// Show namespace status.
    Status,

    /// Delete every variable.
    Reset {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Copy an input or output line to the clipboard.
    ///
    /// `_i7` copies the input from line 7, `_7` and `7` copy its output.
    Copy(CopyArgs),

    /// Serialize a variable to the clipboard, or deserialize the clipboard.
    ///
    /// `serialize` prints the clipboard value, `serialize v` sends `v` to the
    /// clipboard, `serialize -o v` stores the clipboard value in `v`.
    Serialize(SerializeArgs),

    /// Set, get or delete a variable.
    #[command(name = "var")]
    Variable {
        /// Variable name.
        #[arg(value_parser = valid_identifier)]
        name: String,

        /// Value to set, as JSON (plain text is stored as a string).
        value: Option<String>,

        /// Delete the variable.
        #[arg(short, long)]
        delete: bool,
    },

    /// List all variables.
    #[command(name = "vars", alias = "ls")]
    ListVariables,

    /// Run shell command lines (`copy ...`, `serialize ...`).
    ///
    /// Runs the given line, or every line read from stdin when none is
    /// given. Later lines still run after a failure.
    Run {
        /// The command line to run.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::namespace::DEFAULT_DB_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_db_path() {
        let cli = Cli {
            db_path: None,
            clipboard_file: None,
            verbose: false,
            format: "text".to_string(),
            command: Commands::Status,
        };
        assert_eq!(
            cli.get_db_path(),
            PathBuf::from(crate::namespace::DEFAULT_DB_PATH)
        );
    }

    #[test]
    fn test_custom_db_path() {
        let cli = Cli::parse_from(["replclip", "--db-path", "/custom/ns.db", "status"]);
        assert_eq!(cli.get_db_path(), PathBuf::from("/custom/ns.db"));
    }

    #[test]
    fn test_serialize_subcommand() {
        let cli = Cli::parse_from(["replclip", "serialize", "-o", "out"]);
        assert!(matches!(
            cli.command,
            Commands::Serialize(SerializeArgs { output: Some(ref o), var: None }) if o == "out"
        ));
    }

    #[test]
    fn test_run_keeps_hyphen_arguments() {
        let cli = Cli::parse_from(["replclip", "run", "serialize", "-o", "x"]);
        assert!(matches!(
            cli.command,
            Commands::Run { ref line } if line == &["serialize", "-o", "x"]
        ));
    }

    #[test]
    fn test_var_rejects_reserved_word() {
        assert!(Cli::try_parse_from(["replclip", "var", "lambda", "1"]).is_err());
    }
}
