//! Escaped byte-string literals (`b'...'`).
//!
//! The clipboard transport encoding: binary payloads are written as
//! printable byte-string literals and evaluated back into bytes.

use crate::error::DeserializeError;

/// Encodes bytes as a byte-string literal.
///
/// Single quotes are used unless the bytes contain `'` and no `"`.
///
/// # Examples
///
/// ```
/// use replclip::codec::literal;
///
/// assert_eq!(literal::encode(b"hi\n\x80"), r"b'hi\n\x80'");
/// assert_eq!(literal::encode(b"it's"), r#"b"it's""#);
/// ```
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(char::from(quote));
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b == quote => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(b)),
            _ => {
                out.push_str("\\x");
                out.push(hex_digit(b >> 4));
                out.push(hex_digit(b & 0x0f));
            }
        }
    }
    out.push(char::from(quote));
    out
}

const fn hex_digit(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'a' + nibble - 10) as char,
    }
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Checks that text is shaped like a byte-string literal: a `b`/`B` prefix,
/// then the same quote character (`'` or `"`) at position 1 and at the end.
#[must_use]
pub fn looks_like_bytes_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    let quote = bytes[1];
    matches!(bytes[0], b'b' | b'B')
        && matches!(quote, b'\'' | b'"')
        && bytes[bytes.len() - 1] == quote
}

/// Evaluates a byte-string literal back into bytes.
///
/// Supports the simple escapes, `\xhh`, one to three digit octal escapes and
/// backslash-newline continuations. Unknown escapes are kept verbatim.
pub fn decode(text: &str) -> Result<Vec<u8>, DeserializeError> {
    if !looks_like_bytes_literal(text) {
        return Err(invalid("not a byte-string literal"));
    }
    let quote = text.as_bytes()[1];
    let body = &text.as_bytes()[2..text.len() - 1];

    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        i += 1;
        if !b.is_ascii() {
            return Err(invalid("bytes can only contain ASCII literal characters"));
        }
        if b == quote {
            return Err(invalid("unescaped quote inside literal"));
        }
        if matches!(b, b'\n' | b'\r') {
            return Err(invalid("unescaped line break inside literal"));
        }
        if b != b'\\' {
            out.push(b);
            continue;
        }

        let Some(&esc) = body.get(i) else {
            return Err(invalid("literal ends with an unterminated escape"));
        };
        i += 1;
        match esc {
            b'\n' => {}
            b'\\' | b'\'' | b'"' => out.push(esc),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'x' => {
                let value = match body.get(i..i + 2) {
                    Some(&[hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                        (hex_value(hi) << 4) | hex_value(lo)
                    }
                    _ => return Err(truncated_hex(i)),
                };
                out.push(value);
                i += 2;
            }
            b'0'..=b'7' => {
                let mut value = u32::from(esc - b'0');
                let mut taken = 1;
                while taken < 3 {
                    match body.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                            taken += 1;
                        }
                        _ => break,
                    }
                }
                let value = u8::try_from(value)
                    .map_err(|_| invalid(&format!("octal escape value {value:#o} is out of range")))?;
                out.push(value);
            }
            other if other.is_ascii() => {
                out.push(b'\\');
                out.push(other);
            }
            _ => return Err(invalid("bytes can only contain ASCII literal characters")),
        }
    }
    Ok(out)
}

fn invalid(reason: &str) -> DeserializeError {
    DeserializeError::InvalidLiteral(reason.to_string())
}

fn truncated_hex(offset: usize) -> DeserializeError {
    invalid(&format!("truncated \\xXX escape at position {}", offset + 2))
}
