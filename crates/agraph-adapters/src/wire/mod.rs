//! Versioned wire encoding for agtype values.
//!
//! A message is one version byte followed by the value's text form:
//!
//! ```text
//! [version: u8][text: UTF-8 ...]
//! ```
//!
//! The text form is used instead of the binary layout so the message
//! stays readable and independent of the in-memory encoding.

use agraph_common::utils::error::{Error, Result};
use agraph_core::agtype::{encode, from_text};
use agraph_core::Agtype;
use bytes::{BufMut, Bytes, BytesMut};
use tracing::warn;

/// The only message version currently produced and accepted.
pub const WIRE_VERSION: u8 = 1;

/// Serializes a value into a wire message.
///
/// # Errors
///
/// Returns a corruption error if `value` is malformed.
pub fn send(value: &Agtype) -> Result<Bytes> {
    let text = value.to_text(false)?;
    let mut buf = BytesMut::with_capacity(1 + text.len());
    buf.put_u8(WIRE_VERSION);
    buf.put_slice(text.as_bytes());
    Ok(buf.freeze())
}

/// Parses a wire message back into an encoded value.
///
/// # Errors
///
/// Returns a serialization error for an empty message, an unknown
/// version, or a payload that is not UTF-8, and a syntax error if the
/// payload does not parse.
pub fn recv(message: &[u8]) -> Result<Agtype> {
    let Some((&version, payload)) = message.split_first() else {
        return Err(Error::Serialization("empty agtype message".to_string()));
    };
    if version != WIRE_VERSION {
        warn!(version, expected = WIRE_VERSION, "rejecting agtype message");
        return Err(Error::Serialization(format!(
            "unsupported agtype message version {version}"
        )));
    }
    let text = std::str::from_utf8(payload)
        .map_err(|e| Error::Serialization(format!("agtype message is not UTF-8: {e}")))?;
    encode(&from_text(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agraph_core::Value;
    use proptest::prelude::*;

    fn enc(text: &str) -> Agtype {
        encode(&from_text(text).unwrap()).unwrap()
    }

    #[test]
    fn test_message_layout() {
        let msg = send(&enc(r#"{"a": [1, 2.5]}"#)).unwrap();
        assert_eq!(msg[0], WIRE_VERSION);
        assert_eq!(&msg[1..], br#"{"a": [1, 2.5]}"#);
    }

    #[test]
    fn test_round_trip() {
        let vertex = r#"{"id": 1, "label": "V", "properties": {}}::vertex"#;
        for text in ["null", r#""s""#, "[]", vertex] {
            let value = enc(text);
            assert_eq!(recv(&send(&value).unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn test_rejects_bad_framing() {
        assert!(matches!(recv(&[]), Err(Error::Serialization(_))));
        assert!(matches!(recv(b"\x02null"), Err(Error::Serialization(_))));
        assert!(matches!(recv(b"\x01\xff"), Err(Error::Serialization(_))));
        assert!(matches!(recv(b"\x01{"), Err(Error::Query(_))));
    }

    proptest! {
        #[test]
        fn strings_survive_the_wire(s in "[^\\x00]{0,32}") {
            let value = encode(&Value::from(s.as_str())).unwrap();
            prop_assert_eq!(recv(&send(&value).unwrap()).unwrap(), value);
        }
    }
}
