//! Command-token validators.
//!
//! Both validators return the token unchanged on success so they can be used
//! directly as clap value parsers.

use crate::error::ArgumentError;
use regex::Regex;
use std::sync::LazyLock;

/// Cache variables that name recent outputs (`_`, `__`, `___`) and inputs
/// (`_i`, `_ii`, `_iii`).
pub const CACHE_TOKENS: &[&str] = &["_", "__", "___", "_i", "_ii", "_iii"];

/// Reserved words of the host shell language.
pub const RESERVED_WORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

#[allow(clippy::unwrap_used)]
static LINE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:_i?)?[0-9]+$").unwrap());

#[allow(clippy::unwrap_used)]
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{XID_Start}_]\p{XID_Continue}*$").unwrap());

/// Validates a line-reference token.
///
/// Accepts the cache tokens, bare digit strings, and `_`/`_i` followed by
/// digits.
///
/// # Examples
///
/// ```
/// use replclip::core::token::valid_line_number;
///
/// assert!(valid_line_number("_i7").is_ok());
/// assert!(valid_line_number("abc").is_err());
/// ```
pub fn valid_line_number(token: &str) -> Result<String, ArgumentError> {
    if CACHE_TOKENS.contains(&token) || LINE_NUMBER.is_match(token) {
        return Ok(token.to_string());
    }

    let prefix = if token.starts_with("_i") { "_i" } else { "_" };
    if let Some(suffix) = token.strip_prefix(prefix) {
        return Err(ArgumentError::NonDigitSuffix {
            token: token.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        });
    }

    Err(ArgumentError::InvalidLineNumber {
        token: token.to_string(),
    })
}

/// Validates an identifier token: a legal bare name that is not reserved.
pub fn valid_identifier(token: &str) -> Result<String, ArgumentError> {
    if !IDENTIFIER.is_match(token) {
        return Err(ArgumentError::InvalidIdentifier {
            token: token.to_string(),
        });
    }
    if RESERVED_WORDS.contains(&token) {
        return Err(ArgumentError::ReservedWord {
            token: token.to_string(),
        });
    }
    Ok(token.to_string())
}

/// Maps a line reference to its namespace key. Bare digits name an output
/// line, so `7` becomes `_7`.
#[must_use]
pub fn normalize_line_number(token: &str) -> String {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        format!("_{token}")
    } else {
        token.to_string()
    }
}
