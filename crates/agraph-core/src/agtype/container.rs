//! Bounds-checked view over an encoded agtype container.

use std::fmt;
use std::ops::Range;

use agraph_common::utils::error::{Error, Result};
use bigdecimal::BigDecimal;
use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use num_bigint::BigInt;

use super::format::{
    ArrayKind, ContainerKind, ENTRY_CONTAINER, ENTRY_EXTENDED, ENTRY_FALSE, ENTRY_HAS_OFF,
    ENTRY_NULL, ENTRY_NUMERIC, ENTRY_OFFLEN_MASK, ENTRY_STRING, ENTRY_TRUE, ENTRY_TYPE_MASK,
    EXT_FLOAT, EXT_INTEGER, EXT_TIMESTAMP, EXTENDED_SIZE, ObjectKind, key_cmp,
};
use super::iter::Iter;
use super::value::Value;

/// An encoded agtype value.
///
/// Wraps a reference-counted buffer holding exactly one container. The
/// header is validated on construction; entries and payloads are checked
/// against the buffer bounds as they are read. Nested containers are
/// returned as zero-copy slices of the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Agtype {
    buf: Bytes,
    kind: ContainerKind,
    count: usize,
}

impl Agtype {
    /// Wraps an encoded buffer after validating its header.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if the header is malformed or the entry
    /// table runs past the end of the buffer.
    pub fn from_bytes(buf: impl Into<Bytes>) -> Result<Self> {
        let buf = buf.into();
        if buf.len() < 4 {
            return Err(Error::Corruption(format!(
                "buffer of {} bytes is too short for a container header",
                buf.len()
            )));
        }
        let (kind, count) = ContainerKind::parse(LittleEndian::read_u32(&buf[..4]))?;
        let table_end = 4 + kind.entry_count(count) * 4;
        if table_end > buf.len() {
            return Err(Error::Corruption(format!(
                "entry table of {count} elements needs {table_end} bytes, buffer has {}",
                buf.len()
            )));
        }
        Ok(Self { buf, kind, count })
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns a cheap clone of the underlying buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        self.buf.clone()
    }

    /// Container kind from the header.
    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Element count for arrays, pair count for objects.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns true if this is any kind of object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.kind, ContainerKind::Object(_))
    }

    /// Returns true if this is a plain object.
    #[must_use]
    pub fn is_plain_object(&self) -> bool {
        self.kind == ContainerKind::Object(ObjectKind::Plain)
    }

    /// Returns true if this is any kind of array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, ContainerKind::Array(_))
    }

    /// Returns true if this wraps a single root scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.kind == ContainerKind::Array(ArrayKind::RawScalar)
    }

    /// Returns true if this is a vertex.
    #[must_use]
    pub fn is_vertex(&self) -> bool {
        self.kind == ContainerKind::Object(ObjectKind::Vertex)
    }

    /// Returns true if this is an edge.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        self.kind == ContainerKind::Object(ObjectKind::Edge)
    }

    /// Returns true if this is a path.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.kind == ContainerKind::Array(ArrayKind::Path)
    }

    /// Returns a token iterator over the whole value.
    #[must_use]
    pub fn iter(&self) -> Iter {
        Iter::new(self.clone())
    }

    /// Fully decodes the value.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if any part of the buffer is malformed.
    pub fn decode(&self) -> Result<Value> {
        super::decode::decode(self)
    }

    /// Renders the value as text.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if any part of the buffer is malformed.
    pub fn to_text(&self, indent: bool) -> Result<String> {
        super::text::to_text(&self.decode()?, indent)
    }

    /// Returns the scalar wrapped by a raw-scalar root, or `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if the element is malformed.
    pub fn scalar(&self) -> Result<Option<Value>> {
        if self.is_scalar() {
            self.child_value(0).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Looks up a key in an object by binary search over the sorted keys.
    ///
    /// Nested containers are returned as [`Value::Binary`] without decoding.
    /// Returns `None` for missing keys and for non-objects.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if a visited entry is malformed.
    pub fn find_key(&self, key: &str) -> Result<Option<Value>> {
        if !self.is_object() {
            return Ok(None);
        }
        let (mut lo, mut hi) = (0, self.count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = self.key_bytes(mid)?;
            match key_cmp(candidate, key.as_bytes()) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return self.child_value(self.count + mid).map(Some),
            }
        }
        Ok(None)
    }

    /// Returns element `index` of an array, or `None` if out of range or
    /// not an array. Raw-scalar roots have no addressable elements.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if the entry is malformed.
    pub fn get_index(&self, index: usize) -> Result<Option<Value>> {
        match self.kind {
            ContainerKind::Array(ArrayKind::List | ArrayKind::Path) if index < self.count => {
                self.child_value(index).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Iterates over the keys of an object in stored order.
    pub fn keys(&self) -> impl Iterator<Item = Result<&str>> + '_ {
        let n = if self.is_object() { self.count } else { 0 };
        (0..n).map(move |i| self.key_at(i))
    }

    fn entry_total(&self) -> usize {
        self.kind.entry_count(self.count)
    }

    fn entry(&self, i: usize) -> u32 {
        LittleEndian::read_u32(&self.buf[4 + i * 4..8 + i * 4])
    }

    fn data_start(&self) -> usize {
        4 + self.entry_total() * 4
    }

    /// Type bits of entry `i`.
    pub(crate) fn child_type(&self, i: usize) -> u32 {
        self.entry(i) & ENTRY_TYPE_MASK
    }

    /// Absolute byte range of child `i`.
    pub(crate) fn child_range(&self, i: usize) -> Result<Range<usize>> {
        if i >= self.entry_total() {
            return Err(Error::Corruption(format!(
                "entry {i} out of range for container with {} entries",
                self.entry_total()
            )));
        }
        let mut start = 0usize;
        for j in (0..i).rev() {
            let e = self.entry(j);
            start += (e & ENTRY_OFFLEN_MASK) as usize;
            if e & ENTRY_HAS_OFF != 0 {
                break;
            }
        }
        let e = self.entry(i);
        let offlen = (e & ENTRY_OFFLEN_MASK) as usize;
        let end = if e & ENTRY_HAS_OFF != 0 {
            offlen
        } else {
            start + offlen
        };
        let base = self.data_start();
        if end < start || base + end > self.buf.len() {
            return Err(Error::Corruption(format!(
                "entry {i} spans {start}..{end} past the {} data bytes available",
                self.buf.len() - base
            )));
        }
        Ok(base + start..base + end)
    }

    fn key_bytes(&self, i: usize) -> Result<&[u8]> {
        if self.child_type(i) != ENTRY_STRING {
            return Err(Error::Corruption(format!("object key {i} is not a string")));
        }
        let range = self.child_range(i)?;
        Ok(&self.buf[range])
    }

    /// Key `i` of an object as a string.
    pub(crate) fn key_at(&self, i: usize) -> Result<&str> {
        let bytes = self.key_bytes(i)?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::Corruption(format!("object key {i} is not valid UTF-8: {e}")))
    }

    /// Decodes child `i`; nested containers come back as [`Value::Binary`].
    pub(crate) fn child_value(&self, i: usize) -> Result<Value> {
        let range = self.child_range(i)?;
        let ty = self.child_type(i);
        if ty == ENTRY_CONTAINER {
            let child = Agtype::from_bytes(self.buf.slice(range))?;
            if child.is_scalar() {
                return Err(Error::Corruption(
                    "raw scalar container nested inside a container".to_string(),
                ));
            }
            return Ok(Value::Binary(child));
        }
        decode_scalar(ty, &self.buf[range])
    }
}

/// Decodes a scalar payload of the given entry type.
fn decode_scalar(ty: u32, bytes: &[u8]) -> Result<Value> {
    match ty {
        ENTRY_STRING => std::str::from_utf8(bytes)
            .map(|s| Value::String(s.to_string()))
            .map_err(|e| Error::Corruption(format!("string is not valid UTF-8: {e}"))),
        ENTRY_NUMERIC => {
            if bytes.len() < 8 {
                return Err(Error::Corruption(format!(
                    "numeric payload of {} bytes is shorter than its scale",
                    bytes.len()
                )));
            }
            let scale = LittleEndian::read_i64(&bytes[..8]);
            let digits = BigInt::from_signed_bytes_le(&bytes[8..]);
            Ok(Value::Numeric(BigDecimal::new(digits, scale)))
        }
        ENTRY_FALSE => Ok(Value::Bool(false)),
        ENTRY_TRUE => Ok(Value::Bool(true)),
        ENTRY_NULL => Ok(Value::Null),
        ENTRY_EXTENDED => {
            if bytes.len() != EXTENDED_SIZE {
                return Err(Error::Corruption(format!(
                    "extended payload of {} bytes, expected {EXTENDED_SIZE}",
                    bytes.len()
                )));
            }
            let payload = &bytes[4..];
            match LittleEndian::read_u32(&bytes[..4]) {
                EXT_INTEGER => Ok(Value::Integer(LittleEndian::read_i64(payload))),
                EXT_FLOAT => Ok(Value::Float(LittleEndian::read_f64(payload))),
                EXT_TIMESTAMP => Ok(Value::Timestamp(LittleEndian::read_i64(payload))),
                other => Err(Error::Corruption(format!(
                    "unknown extended type {other}"
                ))),
            }
        }
        other => Err(Error::Corruption(format!(
            "unknown entry type {:#x}",
            other >> 28
        ))),
    }
}

impl fmt::Debug for Agtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agtype")
            .field("kind", &self.kind)
            .field("count", &self.count)
            .field("bytes", &self.buf.len())
            .finish()
    }
}

impl fmt::Display for Agtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_text(false).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl AsRef<[u8]> for Agtype {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
