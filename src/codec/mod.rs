//! Clipboard wire codec.
//!
//! Values travel through the clipboard as a binary payload ([`payload`])
//! rendered as an escaped byte-string literal ([`literal`]).

pub mod literal;
pub mod payload;

use crate::core::Value;
use crate::error::{DeserializeError, SerializeError};

/// Serializes a value to clipboard text.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
pub fn to_clipboard_text(value: &Value) -> Result<String, SerializeError> {
    payload::dumps(value).map(|bytes| literal::encode(&bytes))
}

/// Deserializes clipboard text produced by [`to_clipboard_text`].
///
/// The caller is expected to have checked the text's shape with
/// [`literal::looks_like_bytes_literal`].
///
/// # Errors
///
/// Returns an error if the literal or the payload inside it is invalid.
pub fn from_clipboard_text(text: &str) -> Result<Value, DeserializeError> {
    let bytes = literal::decode(text)?;
    payload::loads(&bytes)
}
