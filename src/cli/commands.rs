//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, format_copy, format_serialize, format_status, format_variable,
    format_variable_list,
};
use crate::cli::parser::{Cli, Commands};
use crate::clipboard::{Clipboard, FileClipboard, SystemClipboard};
use crate::core::Value;
use crate::error::{CommandError, Error, Result, StorageError};
use crate::magic::{CopyArgs, SerializeArgs, Session};
use crate::namespace::{Namespace, SqliteNamespace};
use std::io::{self, BufRead};
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Reset { yes } => cmd_reset(&db_path, *yes),
        Commands::Copy(args) => cmd_copy(&db_path, cli, args, format),
        Commands::Serialize(args) => cmd_serialize(&db_path, cli, args, format),
        Commands::Variable {
            name,
            value,
            delete,
        } => cmd_variable(&db_path, name, value.as_deref(), *delete, format),
        Commands::ListVariables => cmd_list_variables(&db_path, format),
        Commands::Run { line } => cmd_run(&db_path, cli, line),
    }
}

/// Opens the namespace and ensures it's initialized.
fn open_namespace(db_path: &Path) -> Result<SqliteNamespace> {
    let namespace = SqliteNamespace::open(db_path)?;

    if !namespace.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(namespace)
}

/// Opens the configured clipboard: a file when `--clipboard-file` is set,
/// the system clipboard otherwise.
fn open_clipboard(cli: &Cli) -> Result<Box<dyn Clipboard>> {
    match &cli.clipboard_file {
        Some(path) => Ok(Box::new(FileClipboard::new(path))),
        None => Ok(Box::new(SystemClipboard::new()?)),
    }
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool) -> Result<String> {
    // A file left behind by a command run before `init` holds no schema.
    if db_path.exists() && !force && SqliteNamespace::open(db_path)?.is_initialized()? {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut namespace = SqliteNamespace::open(db_path)?;
    namespace.init()?;

    Ok(format!(
        "Initialized namespace database at: {}\n",
        db_path.display()
    ))
}

fn cmd_status(db_path: &Path, format: OutputFormat) -> Result<String> {
    let namespace = open_namespace(db_path)?;
    let stats = namespace.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_reset(db_path: &Path, yes: bool) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm reset. This will delete all variables.".to_string(),
        )
        .into());
    }

    let mut namespace = open_namespace(db_path)?;
    namespace.reset()?;

    Ok("Namespace reset successfully.\n".to_string())
}

fn cmd_copy(db_path: &Path, cli: &Cli, args: &CopyArgs, format: OutputFormat) -> Result<String> {
    let mut namespace = open_namespace(db_path)?;
    let mut clipboard = open_clipboard(cli)?;

    let copied = Session::new(&mut namespace, clipboard.as_mut()).copy(&args.line_number)?;
    Ok(format_copy(&copied, format))
}

fn cmd_serialize(
    db_path: &Path,
    cli: &Cli,
    args: &SerializeArgs,
    format: OutputFormat,
) -> Result<String> {
    let mut namespace = open_namespace(db_path)?;
    let mut clipboard = open_clipboard(cli)?;

    let outcome = Session::new(&mut namespace, clipboard.as_mut()).serialize(args)?;
    Ok(format_serialize(&outcome, format))
}

fn cmd_variable(
    db_path: &Path,
    name: &str,
    value: Option<&str>,
    delete: bool,
    format: OutputFormat,
) -> Result<String> {
    let mut namespace = open_namespace(db_path)?;

    if delete {
        return Ok(if namespace.remove(name)? {
            format!("Deleted variable: {name}\n")
        } else {
            format!("Variable '{name}' not found\n")
        });
    }

    if let Some(v) = value {
        let parsed = parse_value(v);
        let shown = parsed.repr();
        namespace.set(name, parsed)?;
        Ok(format!("Set variable: {name} = {shown}\n"))
    } else {
        namespace.get(name)?.map_or_else(
            || Ok(format!("Variable '{name}' not found\n")),
            |v| Ok(format_variable(name, &v, format)),
        )
    }
}

fn cmd_list_variables(db_path: &Path, format: OutputFormat) -> Result<String> {
    let namespace = open_namespace(db_path)?;

    let mut variables = Vec::new();
    for name in namespace.names()? {
        match namespace.get(&name) {
            Ok(value) => variables.push((name, value)),
            // Still listed so it can be found and deleted.
            Err(Error::Storage(e @ StorageError::Corrupt { .. })) => {
                tracing::warn!(error = %e, "unreadable variable");
                variables.push((name, None));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(format_variable_list(&variables, format))
}

fn cmd_run(db_path: &Path, cli: &Cli, line: &[String]) -> Result<String> {
    let mut namespace = open_namespace(db_path)?;
    let mut clipboard = open_clipboard(cli)?;
    let mut session = Session::new(&mut namespace, clipboard.as_mut());

    let lines = if line.is_empty() {
        io::stdin().lock().lines().collect::<io::Result<Vec<_>>>()?
    } else {
        vec![line.join(" ")]
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let mut total = 0usize;
    let mut failed = 0usize;
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        total += 1;
        if !session.run_line(line, &mut out, &mut err) {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CommandError::ExecutionFailed(format!(
            "{failed} of {total} command line(s) failed"
        ))
        .into());
    }

    Ok(String::new())
}

/// Parses a `var` value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map_or_else(|_| Value::String(raw.to_string()), Value::from)
}
