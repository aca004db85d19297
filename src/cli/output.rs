//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::Value;
use crate::error::Error;
use crate::magic::SerializeOutcome;
use crate::namespace::NamespaceStats;
use serde::Serialize;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &NamespaceStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str("replclip Status\n");
            output.push_str("===============\n\n");
            let _ = writeln!(output, "  Variables:     {}", stats.variable_count);
            let _ = writeln!(
                output,
                "  Payload size:  {}",
                format_size(stats.total_payload_size)
            );
            let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
            if let Some(size) = stats.db_size {
                let _ = writeln!(output, "  DB size:       {size} bytes");
            }
            output
        }
        OutputFormat::Json => format_json(stats),
    }
}

/// Formats a variable list. `None` marks a variable whose stored value
/// cannot be read.
#[must_use]
pub fn format_variable_list(variables: &[(String, Option<Value>)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if variables.is_empty() {
                return "No variables found.\n".to_string();
            }

            let mut output = String::new();
            let _ = writeln!(output, "{:<20} {:<10} Value", "Name", "Type");
            output.push_str(&"-".repeat(70));
            output.push('\n');
            for (name, value) in variables {
                let (type_name, shown) = value.as_ref().map_or_else(
                    || ("?".to_string(), "<unreadable>".to_string()),
                    |v| (v.type_name().to_string(), v.repr().replace('\n', "\\n")),
                );
                let _ = writeln!(
                    output,
                    "{:<20} {:<10} {}",
                    truncate(name, 20),
                    type_name,
                    truncate(&shown, 38)
                );
            }
            output
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = variables
                .iter()
                .map(|(name, value)| {
                    let json = value
                        .as_ref()
                        .map_or(serde_json::Value::Null, serde_json::Value::from);
                    (name.clone(), json)
                })
                .collect();
            format_json(&map)
        }
    }
}

/// Formats a single variable.
#[must_use]
pub fn format_variable(name: &str, value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{name} = {}\n", value.repr()),
        OutputFormat::Json => format_json(&serde_json::Value::from(value)),
    }
}

/// Formats the result of `copy`. Text mode prints nothing, like the shell
/// command.
#[must_use]
pub fn format_copy(copied: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => String::new(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct CopyOutput<'a> {
                copied: &'a str,
                size: usize,
            }
            format_json(&CopyOutput {
                copied,
                size: copied.len(),
            })
        }
    }
}

/// Formats the result of `serialize`.
#[must_use]
pub fn format_serialize(outcome: &SerializeOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match outcome {
            SerializeOutcome::Printed { text } => format!("{text}\n"),
            SerializeOutcome::Copied { .. } | SerializeOutcome::Stored { .. } => String::new(),
        },
        OutputFormat::Json => format_json(outcome),
    }
}

/// Formats an error.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).map_or_else(|_| "{}\n".to_string(), |s| s + "\n")
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Truncates a string to `max_len` graphemes with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    if graphemes.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        graphemes[..max_len].concat()
    } else {
        format!("{}...", graphemes[..max_len - 3].concat())
    }
}
