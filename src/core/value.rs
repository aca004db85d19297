//! Namespace values.
//!
//! Values held in the shell namespace. Every variant except
//! [`Value::Opaque`] can round-trip through the clipboard payload format.

use crate::codec::literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value stored in the shell namespace.
///
/// # Examples
///
/// ```
/// use replclip::core::Value;
///
/// let v: Value = vec![1i64, 2, 3].into();
/// assert_eq!(v.to_string(), "[1, 2, 3]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null/None value.
    Null,

    /// Boolean value.
    Boolean(bool),

    /// Integer value (i64).
    Integer(i64),

    /// Floating point value (f64).
    Float(f64),

    /// String value.
    String(String),

    /// Raw byte sequence.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    List(Vec<Self>),

    /// Key-value mapping with string keys.
    Map(BTreeMap<String, Self>),

    /// Host object with no portable representation (handles, callables).
    #[serde(skip)]
    Opaque {
        /// Host type name, reported in error messages.
        type_name: String,
    },
}

impl Value {
    /// Creates an opaque host value of the given type.
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self::Opaque {
            type_name: type_name.into(),
        }
    }

    /// Returns the type name shown in error messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "NoneType",
            Self::Boolean(_) => "bool",
            Self::Integer(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "dict",
            Self::Opaque { type_name } => type_name,
        }
    }

    /// Returns the nesting depth. Scalars have depth 1.
    ///
    /// Walks the value with an explicit stack so very deep values cannot
    /// exhaust the call stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((value, level)) = stack.pop() {
            max = max.max(level);
            match value {
                Self::List(items) => stack.extend(items.iter().map(|v| (v, level + 1))),
                Self::Map(entries) => stack.extend(entries.values().map(|v| (v, level + 1))),
                _ => {}
            }
        }
        max
    }

    /// Finds the first opaque value, if any.
    #[must_use]
    pub fn find_opaque(&self) -> Option<&Self> {
        let mut stack = vec![self];
        while let Some(value) = stack.pop() {
            match value {
                Self::Opaque { .. } => return Some(value),
                Self::List(items) => stack.extend(items.iter()),
                Self::Map(entries) => stack.extend(entries.values()),
                _ => {}
            }
        }
        None
    }

    /// Returns the quoted representation used for nested values.
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::String(s) => quote_str(s),
            other => other.to_string(),
        }
    }
}

/// Quotes a string the way the shell prints nested strings.
fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn fmt_float(f: f64, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    if f.is_nan() {
        out.write_str("nan")
    } else if f.is_infinite() {
        out.write_str(if f > 0.0 { "inf" } else { "-inf" })
    } else {
        // Debug keeps the fractional part (`1.0`) that Display drops and
        // switches to exponents at the same magnitudes as the shell.
        let text = format!("{f:?}");
        match text.split_once('e') {
            // The shell signs the exponent and pads it to two digits.
            Some((mantissa, exp)) => {
                let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
                write!(out, "{mantissa}e{sign}{digits:0>2}")
            }
            None => out.write_str(&text),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Boolean(true) => f.write_str("True"),
            Self::Boolean(false) => f.write_str("False"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => fmt_float(*x, f),
            Self::String(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&literal::encode(b)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.repr())?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", quote_str(key), value.repr())?;
                }
                f.write_str("}")
            }
            Self::Opaque { type_name } => write!(f, "<{type_name} object>"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

#[allow(clippy::use_self)]
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

#[allow(clippy::use_self)]
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || Self::Float(n.as_f64().unwrap_or(f64::NAN)),
                Self::Integer,
            ),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Boolean(b) => Self::Bool(*b),
            Value::Integer(n) => Self::from(*n),
            Value::Float(x) => serde_json::Number::from_f64(*x).map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s.clone()),
            Value::Bytes(_) | Value::Opaque { .. } => Self::String(value.to_string()),
            Value::List(items) => Self::Array(items.iter().map(Into::into).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, Value)]) -> Value {
        Value::Map(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::Boolean(true).to_string(), "True");
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::from("hello").to_string(), "hello");
    }

    #[test]
    fn test_display_float_exponents() {
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Value::Float(-2.5e100).to_string(), "-2.5e+100");
        assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
    }

    #[test]
    fn test_display_nested_quotes_strings() {
        let v = Value::List(vec![1i64.into(), "a".into(), Value::Null]);
        assert_eq!(v.to_string(), "[1, 'a', None]");

        let v = map(&[("b", "it's".into()), ("a", 1i64.into())]);
        assert_eq!(v.to_string(), "{'a': 1, 'b': \"it's\"}");
    }

    #[test]
    fn test_display_bytes_and_opaque() {
        assert_eq!(Value::from(&b"ab\x00"[..]).to_string(), r"b'ab\x00'");
        assert_eq!(Value::opaque("socket").to_string(), "<socket object>");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "NoneType");
        assert_eq!(Value::List(vec![]).type_name(), "list");
        assert_eq!(Value::opaque("generator").type_name(), "generator");
    }

    #[test]
    fn test_depth() {
        assert_eq!(Value::Integer(1).depth(), 1);
        assert_eq!(Value::List(vec![]).depth(), 1);
        let nested = Value::List(vec![Value::List(vec![map(&[("k", 1i64.into())])])]);
        assert_eq!(nested.depth(), 4);
    }

    #[test]
    fn test_find_opaque_nested() {
        let v = map(&[("ok", 1i64.into()), ("bad", vec![Value::opaque("lock")].into())]);
        assert_eq!(v.find_opaque(), Some(&Value::opaque("lock")));
        assert_eq!(Value::Integer(3).find_opaque(), None);
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#).unwrap();
        let v: Value = json.into();
        assert_eq!(
            v,
            map(&[(
                "a",
                Value::List(vec![
                    1i64.into(),
                    2.5.into(),
                    "x".into(),
                    Value::Null,
                    true.into()
                ])
            )])
        );
    }

    #[test]
    fn test_to_json() {
        let v = map(&[("n", 3i64.into()), ("s", "t".into())]);
        let json = serde_json::Value::from(&v);
        assert_eq!(json, serde_json::json!({"n": 3, "s": "t"}));
    }

    #[test]
    fn test_value_from_option() {
        let none: Value = Option::<String>::None.into();
        assert_eq!(none, Value::Null);
        let some: Value = Some(42i64).into();
        assert_eq!(some, Value::Integer(42));
    }
}
