//! Error types for replclip operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! command handlers, the clipboard wire codec, the namespace backends and
//! the CLI.

use thiserror::Error;

/// Result type alias for replclip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Documentation for the payload format, cited by serialization errors.
pub const FORMAT_DOCS: &str = "https://docs.rs/bincode/1.3";

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed line-reference or identifier token.
    #[error("{0}")]
    Argument(#[from] ArgumentError),

    /// Clipboard content or backend errors.
    #[error("{0}")]
    Clipboard(#[from] ClipboardError),

    /// A value could not be serialized.
    #[error("{0}")]
    Serialize(#[from] SerializeError),

    /// Clipboard content could not be deserialized.
    #[error("{0}")]
    Deserialize(#[from] DeserializeError),

    /// Namespace storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Command usage and execution errors.
    #[error("{0}")]
    Command(#[from] CommandError),

    /// I/O errors (clipboard files, output streams).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

/// Argument-format errors raised while validating command tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// Token is not a line number nor a cache variable.
    #[error("{token} is not a valid line number or a valid cache variable (eg. `_` or `_i3`)")]
    InvalidLineNumber {
        /// The rejected token.
        token: String,
    },

    /// Token starts with a cache prefix but the rest is not a line number.
    #[error("{token} starts with `{prefix}` but `{suffix}` is not a line number (eg. `{prefix}3`)")]
    NonDigitSuffix {
        /// The rejected token.
        token: String,
        /// The recognised prefix (`_` or `_i`).
        prefix: String,
        /// Everything after the prefix.
        suffix: String,
    },

    /// Token is not a syntactically valid name.
    #[error("{token} is not a valid identifier.")]
    InvalidIdentifier {
        /// The rejected token.
        token: String,
    },

    /// Token is a reserved word.
    #[error("{token} is not a valid identifier: it is a reserved word.")]
    ReservedWord {
        /// The rejected token.
        token: String,
    },
}

/// Clipboard errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Clipboard text is not shaped like `b'...'`.
    #[error(r"Your clipboard doesn't have a bytes-like string (ie. b'\x80\x01\x00')")]
    NotBytesLiteral,

    /// Clipboard holds no text.
    #[error("Your clipboard is empty")]
    Empty,

    /// The clipboard backend failed.
    #[error("clipboard unavailable: {0}")]
    Backend(String),
}

/// Serialization errors. The clipboard is never written when these occur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// Value nests deeper than the serializer allows.
    #[error(
        "maximum recursion depth exceeded while serializing: the value nests deeper than {limit} levels (see {docs})",
        docs = FORMAT_DOCS
    )]
    TooDeep {
        /// Maximum supported depth.
        limit: usize,
    },

    /// Encoded value exceeds the payload size limit.
    #[error("value is too large to serialize: the payload exceeds {limit} bytes (see {docs})", docs = FORMAT_DOCS)]
    TooLarge {
        /// Maximum payload size in bytes.
        limit: u64,
    },

    /// Value type cannot be serialized at all.
    #[error("object of type '{type_name}' is not serializable (see {docs})", docs = FORMAT_DOCS)]
    NotSerializable {
        /// Type name of the offending value.
        type_name: String,
    },

    /// Encoder failure.
    #[error("serialization failed: {0} (see {docs})", docs = FORMAT_DOCS)]
    Encode(String),
}

/// Deserialization errors. No namespace entry is written when these occur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeserializeError {
    /// Text could not be evaluated as a byte-string literal.
    #[error("Your clipboard contents could not be unpickled: invalid bytes literal: {0}")]
    InvalidLiteral(String),

    /// Payload header is absent or unknown.
    #[error("Your clipboard contents could not be unpickled: missing type information")]
    MissingHeader,

    /// Payload nests deeper than the decoder allows.
    #[error("Your clipboard contents could not be unpickled: nesting exceeds {limit} levels")]
    TooDeep {
        /// Maximum supported depth.
        limit: usize,
    },

    /// Payload body is not a valid encoding.
    #[error("Your clipboard contents could not be unpickled: {0}")]
    Malformed(String),
}

impl DeserializeError {
    /// Describes the failure without the clipboard wording, for payloads
    /// read from other places.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidLiteral(reason) => format!("invalid bytes literal: {reason}"),
            Self::MissingHeader => "missing type information".to_string(),
            Self::TooDeep { limit } => format!("nesting exceeds {limit} levels"),
            Self::Malformed(reason) => reason.clone(),
        }
    }
}

/// Namespace storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Storage not initialized (init command not run).
    #[error("namespace not initialized. Run: replclip init")]
    NotInitialized,

    /// Stored blob could not be decoded.
    #[error("corrupt variable '{name}': {reason}")]
    Corrupt {
        /// Variable name.
        name: String,
        /// Decoder message.
        reason: String,
    },
}

/// Command usage and execution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// `serialize` given both a source variable and an output target.
    #[error(
        "Incorrect usage, you can either serialize a variable, or deserialize, but not both at the same time.\n\n`serialize {var}` to serialize the contents of `{var}` and send them to your clipboard\n`serialize -o {output}` to deserialize clipboard contents and send them to `{output}`\n`serialize` to deserialize your clipboard contents and print"
    )]
    UsageConflict {
        /// The source variable that was given.
        var: String,
        /// The output target that was given.
        output: String,
    },

    /// Command line could not be parsed.
    #[error("{0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

/// I/O errors.
#[derive(Error, Debug)]
pub enum IoError {
    /// Failed to read a file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write a file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("{0}")]
    Generic(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}

impl From<clap::Error> for CommandError {
    fn from(err: clap::Error) -> Self {
        Self::InvalidArgument(err.to_string().trim_end().to_string())
    }
}
