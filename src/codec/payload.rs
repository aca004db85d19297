//! Binary payload encoding for namespace values.
//!
//! A payload is a two byte header (`0x80`, protocol version) followed by the
//! `bincode` encoding of a [`Value`].

use crate::core::Value;
use crate::error::{DeserializeError, SerializeError};
use bincode::Options;

/// First header byte.
pub const MARKER: u8 = 0x80;

/// Payload protocol version.
pub const PROTOCOL: u8 = 1;

/// Maximum nesting depth accepted in either direction.
pub const MAX_DEPTH: usize = 1000;

/// Maximum encoded size of a payload body, in bytes.
pub const MAX_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_PAYLOAD_BYTES)
        .reject_trailing_bytes()
}

/// Serializes a value into a payload.
///
/// # Examples
///
/// ```
/// use replclip::codec::payload::{dumps, loads};
/// use replclip::core::Value;
///
/// let bytes = dumps(&Value::from("hi")).unwrap();
/// assert_eq!(loads(&bytes).unwrap(), Value::from("hi"));
/// ```
pub fn dumps(value: &Value) -> Result<Vec<u8>, SerializeError> {
    if let Some(opaque) = value.find_opaque() {
        return Err(SerializeError::NotSerializable {
            type_name: opaque.type_name().to_string(),
        });
    }
    if value.depth() > MAX_DEPTH {
        return Err(SerializeError::TooDeep { limit: MAX_DEPTH });
    }

    let body = options().serialize(value).map_err(|err| match *err {
        bincode::ErrorKind::SizeLimit => SerializeError::TooLarge {
            limit: MAX_PAYLOAD_BYTES,
        },
        ref other => SerializeError::Encode(other.to_string()),
    })?;

    let mut payload = Vec::with_capacity(body.len() + 2);
    payload.push(MARKER);
    payload.push(PROTOCOL);
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Deserializes a payload produced by [`dumps`].
pub fn loads(payload: &[u8]) -> Result<Value, DeserializeError> {
    let body = match payload {
        [MARKER, PROTOCOL, body @ ..] => body,
        _ => return Err(DeserializeError::MissingHeader),
    };
    check_depth(body)?;
    options()
        .deserialize(body)
        .map_err(|err| DeserializeError::Malformed(err.to_string()))
}

/// Rejects bodies that nest deeper than [`MAX_DEPTH`] before the recursive
/// decoder sees them.
fn check_depth(body: &[u8]) -> Result<(), DeserializeError> {
    if exceeds_depth(body) == Some(true) {
        return Err(DeserializeError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

/// Walks the encoding iteratively. Tags follow the declaration order of
/// [`Value`]. Returns `None` for anything it cannot follow; `bincode` reports
/// those.
fn exceeds_depth(body: &[u8]) -> Option<bool> {
    struct Frame {
        remaining: u64,
        map: bool,
    }

    let mut reader = Reader { bytes: body };
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        if stack.last().is_some_and(|frame| frame.map) {
            let key_len = reader.varint()?;
            reader.skip(key_len)?;
        }

        let opened = match reader.varint()? {
            0 => None,
            1 => {
                reader.skip(1)?;
                None
            }
            2 => {
                reader.varint()?;
                None
            }
            3 => {
                reader.skip(8)?;
                None
            }
            4 | 5 => {
                let len = reader.varint()?;
                reader.skip(len)?;
                None
            }
            tag @ (6 | 7) => {
                let len = reader.varint()?;
                (len > 0).then_some(Frame {
                    remaining: len,
                    map: tag == 7,
                })
            }
            _ => return None,
        };

        if let Some(frame) = opened {
            if stack.len() + 2 > MAX_DEPTH {
                return Some(true);
            }
            stack.push(frame);
            continue;
        }

        // A value finished; close every container it completed.
        loop {
            let Some(frame) = stack.last_mut() else {
                return Some(false);
            };
            frame.remaining -= 1;
            if frame.remaining > 0 {
                break;
            }
            stack.pop();
        }
    }
}

/// Cursor over `bincode` varint-encoded bytes.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl Reader<'_> {
    fn skip(&mut self, len: u64) -> Option<()> {
        let len = usize::try_from(len).ok()?;
        self.bytes = self.bytes.get(len..)?;
        Some(())
    }

    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let (head, rest) = self.bytes.split_first_chunk::<N>()?;
        self.bytes = rest;
        Some(*head)
    }

    fn varint(&mut self) -> Option<u64> {
        let [first] = self.take::<1>()?;
        match first {
            0..=250 => Some(u64::from(first)),
            251 => self.take::<2>().map(|b| u64::from(u16::from_le_bytes(b))),
            252 => self.take::<4>().map(|b| u64::from(u32::from_le_bytes(b))),
            253 => self.take::<8>().map(u64::from_le_bytes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn nested_list(depth: usize) -> Value {
        let mut value = Value::Integer(0);
        for _ in 1..depth {
            value = Value::List(vec![value]);
        }
        value
    }

    /// Encoding and decoding recurse once per level; debug builds need more
    /// than the default test thread stack at the depth limit.
    fn with_large_stack(f: impl FnOnce() + Send + 'static) {
        std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(f)
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn test_header() {
        let payload = dumps(&Value::Null).unwrap();
        assert_eq!(&payload[..2], &[MARKER, PROTOCOL]);
    }

    #[test]
    fn test_round_trip_composite() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("clip"));
        map.insert("ratio".to_string(), Value::Float(0.25));
        map.insert("raw".to_string(), Value::Bytes(vec![0, 159, 255]));
        map.insert("big".to_string(), Value::Integer(i64::MIN));
        let value = Value::List(vec![
            Value::Map(map),
            Value::Boolean(false),
            Value::Null,
            Value::List(vec![]),
            Value::Map(BTreeMap::new()),
        ]);

        let payload = dumps(&value).unwrap();
        assert_eq!(loads(&payload).unwrap(), value);
    }

    #[test]
    fn test_dumps_rejects_opaque() {
        let value = Value::List(vec![1i64.into(), Value::opaque("file")]);
        assert_eq!(
            dumps(&value),
            Err(SerializeError::NotSerializable {
                type_name: "file".to_string()
            })
        );
    }

    #[test]
    fn test_depth_limit() {
        with_large_stack(|| {
            assert!(dumps(&nested_list(MAX_DEPTH)).is_ok());
            assert_eq!(
                dumps(&nested_list(MAX_DEPTH + 1)),
                Err(SerializeError::TooDeep { limit: MAX_DEPTH })
            );
        });
    }

    #[test]
    fn test_loads_accepts_max_depth() {
        with_large_stack(|| {
            let value = nested_list(MAX_DEPTH);
            let payload = dumps(&value).unwrap();
            assert_eq!(loads(&payload).unwrap(), value);
        });
    }

    #[test]
    fn test_loads_rejects_deep_body() {
        // List tag (6) with one element, repeated past the limit.
        let mut payload = vec![MARKER, PROTOCOL];
        for _ in 0..=MAX_DEPTH {
            payload.extend_from_slice(&[6, 1]);
        }
        payload.push(0);
        assert_eq!(
            loads(&payload),
            Err(DeserializeError::TooDeep { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn test_loads_missing_header() {
        assert_eq!(loads(b""), Err(DeserializeError::MissingHeader));
        assert_eq!(loads(b"\x80\x04N."), Err(DeserializeError::MissingHeader));
        assert_eq!(loads(b"hello"), Err(DeserializeError::MissingHeader));
    }

    #[test]
    fn test_loads_malformed_body() {
        assert!(matches!(
            loads(&[MARKER, PROTOCOL, 42]),
            Err(DeserializeError::Malformed(_))
        ));
        assert!(matches!(
            loads(&[MARKER, PROTOCOL]),
            Err(DeserializeError::Malformed(_))
        ));
        // Trailing garbage after a complete value.
        let mut payload = dumps(&Value::Integer(1)).unwrap();
        payload.push(0);
        assert!(matches!(
            loads(&payload),
            Err(DeserializeError::Malformed(_))
        ));
    }
}
