//! Command handlers.
//!
//! A [`Session`] borrows the host's namespace and clipboard for the
//! duration of one or more commands. Each command runs to completion and
//! keeps no state between calls beyond its effect on those two stores.

use crate::clipboard::Clipboard;
use crate::codec::{self, literal};
use crate::core::token::{normalize_line_number, valid_identifier, valid_line_number};
use crate::core::Value;
use crate::error::{ClipboardError, CommandError, Result};
use crate::magic::args::{MagicCommand, SerializeArgs, parse_line};
use crate::namespace::Namespace;
use serde::Serialize;
use std::io::Write;

/// What a successful `serialize` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SerializeOutcome {
    /// A variable was serialized; `literal` is now on the clipboard.
    Copied {
        /// The clipboard text.
        literal: String,
    },
    /// The clipboard value was stored in `name`.
    Stored {
        /// The namespace entry written.
        name: String,
    },
    /// The clipboard value should be printed.
    Printed {
        /// The value's string form.
        text: String,
    },
}

/// Explicit context for the command handlers.
pub struct Session<'a> {
    namespace: &'a mut dyn Namespace,
    clipboard: &'a mut dyn Clipboard,
}

impl<'a> Session<'a> {
    /// Creates a session over the host's namespace and clipboard.
    pub fn new(namespace: &'a mut dyn Namespace, clipboard: &'a mut dyn Clipboard) -> Self {
        Self {
            namespace,
            clipboard,
        }
    }

    /// Copies the string form of a cached line to the clipboard.
    ///
    /// Bare digits name an output line (`7` is `_7`). A missing entry copies
    /// an empty string. Returns the copied text.
    ///
    /// # Examples
    ///
    /// ```
    /// use replclip::clipboard::MemoryClipboard;
    /// use replclip::magic::Session;
    /// use replclip::namespace::MemoryNamespace;
    ///
    /// let mut ns: MemoryNamespace = [("_", "hello")].into_iter().collect();
    /// let mut clip = MemoryClipboard::default();
    /// Session::new(&mut ns, &mut clip).copy("_").unwrap();
    /// assert_eq!(clip.contents(), "hello");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed token or a clipboard failure.
    pub fn copy(&mut self, line_number: &str) -> Result<String> {
        let token = valid_line_number(line_number)?;
        let key = normalize_line_number(&token);
        let content = self
            .namespace
            .get(&key)?
            .map(|value| value.to_string())
            .unwrap_or_default();

        self.clipboard.write(&content)?;
        tracing::debug!(key = %key, bytes = content.len(), "copied line to clipboard");
        Ok(content)
    }

    /// Serializes a variable to the clipboard or deserializes the clipboard,
    /// depending on which arguments are present.
    ///
    /// Giving both `var` and `output` is a usage error and touches neither
    /// store.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid names, conflicting arguments, a clipboard
    /// without a byte string literal, or a value that cannot be encoded.
    pub fn serialize(&mut self, args: &SerializeArgs) -> Result<SerializeOutcome> {
        if let Some(output) = &args.output {
            valid_identifier(output)?;
        }
        if let Some(var) = &args.var {
            valid_identifier(var)?;
        }

        match (&args.var, &args.output) {
            (Some(var), Some(output)) => Err(CommandError::UsageConflict {
                var: var.clone(),
                output: output.clone(),
            }
            .into()),
            (Some(var), None) => self.dump(var),
            (None, output) => self.load(output.as_deref()),
        }
    }

    /// Runs a parsed command, returning the text for standard output.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub fn run(&mut self, command: &MagicCommand) -> Result<String> {
        match command {
            MagicCommand::Copy(args) => self.copy(&args.line_number).map(|_| String::new()),
            MagicCommand::Serialize(args) => match self.serialize(args)? {
                SerializeOutcome::Printed { text } => Ok(text),
                SerializeOutcome::Copied { .. } | SerializeOutcome::Stored { .. } => {
                    Ok(String::new())
                }
            },
        }
    }

    /// Parses and runs one command line.
    ///
    /// Normal output goes to `out`; every failure is reported to `err` as a
    /// human-readable message and never propagated. Returns `true` on
    /// success.
    pub fn run_line<O: Write, E: Write>(&mut self, line: &str, out: &mut O, err: &mut E) -> bool {
        match parse_line(line).and_then(|command| self.run(&command)) {
            Ok(output) => {
                if !output.is_empty() {
                    let _ = writeln!(out, "{output}");
                }
                true
            }
            Err(e) => {
                tracing::warn!(line, error = %e, "command failed");
                let _ = writeln!(err, "{e}");
                false
            }
        }
    }

    fn dump(&mut self, var: &str) -> Result<SerializeOutcome> {
        let value = self.namespace.get_or(var, Value::Null)?;
        let text = codec::to_clipboard_text(&value)?;
        self.clipboard.write(&text)?;
        tracing::debug!(var, bytes = text.len(), "serialized variable to clipboard");
        Ok(SerializeOutcome::Copied { literal: text })
    }

    fn load(&mut self, output: Option<&str>) -> Result<SerializeOutcome> {
        let content = self.clipboard.read()?;
        let text = content.trim();
        if text.is_empty() {
            return Err(ClipboardError::Empty.into());
        }
        if !literal::looks_like_bytes_literal(text) {
            return Err(ClipboardError::NotBytesLiteral.into());
        }

        let value = codec::from_clipboard_text(text)?;
        match output {
            Some(name) => {
                self.namespace.set(name, value)?;
                tracing::debug!(name, "stored clipboard value");
                Ok(SerializeOutcome::Stored {
                    name: name.to_string(),
                })
            }
            None => Ok(SerializeOutcome::Printed {
                text: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::codec::payload::MAX_DEPTH;
    use crate::error::{ArgumentError, DeserializeError, Error, SerializeError};
    use crate::namespace::MemoryNamespace;

    fn args(output: Option<&str>, var: Option<&str>) -> SerializeArgs {
        SerializeArgs {
            output: output.map(str::to_string),
            var: var.map(str::to_string),
        }
    }

    #[test]
    fn test_copy_last_output() {
        let mut ns: MemoryNamespace = [("_", "hello")].into_iter().collect();
        let mut clip = MemoryClipboard::default();
        let copied = Session::new(&mut ns, &mut clip).copy("_").unwrap();
        assert_eq!(copied, "hello");
        assert_eq!(clip.contents(), "hello");
    }

    #[test]
    fn test_copy_digits_means_output_line() {
        let mut ns: MemoryNamespace = [("_7", Value::from(vec![1i64, 2]))].into_iter().collect();
        let mut clip = MemoryClipboard::default();
        Session::new(&mut ns, &mut clip).copy("7").unwrap();
        assert_eq!(clip.contents(), "[1, 2]");
    }

    #[test]
    fn test_copy_missing_entry_copies_empty_string() {
        let mut ns = MemoryNamespace::new();
        let mut clip = MemoryClipboard::with_text("old");
        Session::new(&mut ns, &mut clip).copy("_i3").unwrap();
        assert_eq!(clip.contents(), "");
        assert_eq!(clip.writes(), 1);
    }

    #[test]
    fn test_copy_rejects_bad_token() {
        let mut ns = MemoryNamespace::new();
        let mut clip = MemoryClipboard::with_text("old");
        let err = Session::new(&mut ns, &mut clip).copy("abc").unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        assert_eq!(clip.writes(), 0);
    }

    #[test]
    fn test_serialize_then_deserialize() {
        let mut ns: MemoryNamespace = [("v", Value::from(vec!["a", "b"]))].into_iter().collect();
        let mut clip = MemoryClipboard::default();
        let mut session = Session::new(&mut ns, &mut clip);

        let outcome = session.serialize(&args(None, Some("v"))).unwrap();
        assert!(matches!(outcome, SerializeOutcome::Copied { ref literal } if literal.starts_with("b'")));

        let outcome = session.serialize(&args(Some("w"), None)).unwrap();
        assert_eq!(
            outcome,
            SerializeOutcome::Stored {
                name: "w".to_string()
            }
        );
        assert_eq!(ns.get("w").unwrap(), ns.get("v").unwrap());
    }

    #[test]
    fn test_serialize_missing_variable_is_null() {
        let mut ns = MemoryNamespace::new();
        let mut clip = MemoryClipboard::default();
        let mut session = Session::new(&mut ns, &mut clip);
        session.serialize(&args(None, Some("nothing"))).unwrap();
        let printed = session.serialize(&args(None, None)).unwrap();
        assert_eq!(
            printed,
            SerializeOutcome::Printed {
                text: "None".to_string()
            }
        );
    }

    #[test]
    fn test_usage_conflict_touches_nothing() {
        let mut ns: MemoryNamespace = [("v", 1i64)].into_iter().collect();
        let before = ns.clone();
        let mut clip = MemoryClipboard::with_text("b'x'");
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(Some("o"), Some("v")))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Command(CommandError::UsageConflict { .. })
        ));
        assert_eq!(ns, before);
        assert_eq!(clip.writes(), 0);
    }

    #[test]
    fn test_deserialize_rejects_non_literal() {
        let mut ns: MemoryNamespace = [("x", 5i64)].into_iter().collect();
        let mut clip = MemoryClipboard::with_text("just some text");
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(Some("x"), None))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Clipboard(ClipboardError::NotBytesLiteral)
        ));
        assert_eq!(ns.get("x").unwrap(), Some(Value::Integer(5)));
    }

    #[test]
    fn test_deserialize_empty_clipboard() {
        let mut ns = MemoryNamespace::new();
        let mut clip = MemoryClipboard::with_text("  \n");
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(None, None))
            .unwrap_err();
        assert!(matches!(err, Error::Clipboard(ClipboardError::Empty)));
    }

    #[test]
    fn test_deserialize_garbage_payload() {
        let mut ns = MemoryNamespace::new();
        let mut clip = MemoryClipboard::with_text(r"b'\x80\x04N.'");
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(Some("x"), None))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Deserialize(DeserializeError::MissingHeader)
        ));
        assert!(ns.is_empty());
    }

    #[test]
    fn test_serialize_opaque_leaves_clipboard() {
        let mut ns: MemoryNamespace = [("h", Value::opaque("handle"))].into_iter().collect();
        let mut clip = MemoryClipboard::with_text("keep");
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(None, Some("h")))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Serialize(SerializeError::NotSerializable { .. })
        ));
        assert_eq!(clip.contents(), "keep");
    }

    #[test]
    fn test_serialize_too_deep_leaves_clipboard() {
        let mut value = Value::Null;
        for _ in 0..=MAX_DEPTH {
            value = Value::List(vec![value]);
        }
        let mut ns: MemoryNamespace = [("deep", value)].into_iter().collect();
        let mut clip = MemoryClipboard::with_text("keep");
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(None, Some("deep")))
            .unwrap_err();
        assert!(err.to_string().contains("maximum recursion depth exceeded"));
        assert_eq!(clip.contents(), "keep");
    }

    #[test]
    fn test_serialize_validates_tokens() {
        let mut ns = MemoryNamespace::new();
        let mut clip = MemoryClipboard::default();
        let err = Session::new(&mut ns, &mut clip)
            .serialize(&args(Some("class"), None))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Argument(ArgumentError::ReservedWord { .. })
        ));
    }

    #[test]
    fn test_run_line_routes_output_and_errors() {
        let mut ns: MemoryNamespace = [("v", "text")].into_iter().collect();
        let mut clip = MemoryClipboard::default();
        let mut session = Session::new(&mut ns, &mut clip);
        let (mut out, mut err) = (Vec::new(), Vec::new());

        assert!(session.run_line("serialize v", &mut out, &mut err));
        assert!(session.run_line("serialize", &mut out, &mut err));
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "text\n");
        assert!(err.is_empty());

        assert!(!session.run_line("serialize v -o o", &mut out, &mut err));
        let message = String::from_utf8(err).unwrap();
        assert!(message.starts_with("Incorrect usage"));
        assert_eq!(String::from_utf8(out).unwrap(), "text\n");
    }
}
