//! Streaming value construction.

use agraph_common::utils::error::{Error, Result};

use super::format::{ArrayKind, MAX_DEPTH, ObjectKind, depth_message};
use super::graph::{check_path_shape, edge_from_pairs, vertex_from_pairs};
use super::iter::Token;
use super::value::{Value, canonicalize_pairs};

enum Frame {
    Object {
        kind: ObjectKind,
        pairs: Vec<(String, Value)>,
        pending_key: Option<String>,
    },
    Array {
        kind: ArrayKind,
        elems: Vec<Value>,
    },
}

/// Builds a [`Value`] from a sequence of begin/key/value/end pushes.
///
/// Pieces may be already-encoded containers (pushed as
/// [`Value::Binary`]), so large values can be assembled without decoding
/// their parts. Closing an object sorts its pairs into canonical key order
/// and rejects duplicate keys; closing a vertex, edge, or path checks its
/// required shape. Opening a container more than [`MAX_DEPTH`] levels deep
/// fails with `Error::Capacity`.
///
/// ```
/// use agraph_core::agtype::{Value, ValueBuilder};
///
/// let mut b = ValueBuilder::new();
/// b.begin_object().unwrap();
/// b.key("name").unwrap();
/// b.value(Value::from("Ann")).unwrap();
/// b.end_object().unwrap();
/// let v = b.finish().unwrap();
/// assert_eq!(v.get("name"), Some(&Value::from("Ann")));
/// ```
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    result: Option<Value>,
}

impl ValueBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a plain object.
    pub fn begin_object(&mut self) -> Result<()> {
        self.begin_object_with(ObjectKind::Plain)
    }

    /// Opens an object of the given kind.
    pub fn begin_object_with(&mut self, kind: ObjectKind) -> Result<()> {
        self.check_open_slot()?;
        self.stack.push(Frame::Object {
            kind,
            pairs: Vec::new(),
            pending_key: None,
        });
        Ok(())
    }

    /// Opens a plain array.
    pub fn begin_array(&mut self) -> Result<()> {
        self.begin_array_with(ArrayKind::List)
    }

    /// Opens an array of the given kind.
    pub fn begin_array_with(&mut self, kind: ArrayKind) -> Result<()> {
        self.check_open_slot()?;
        if kind == ArrayKind::RawScalar && !self.stack.is_empty() {
            return Err(usage("raw scalar wrapper is only allowed at the root"));
        }
        self.stack.push(Frame::Array {
            kind,
            elems: Vec::new(),
        });
        Ok(())
    }

    /// Sets the key for the next value of the innermost object.
    pub fn key(&mut self, key: impl Into<String>) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_key, .. }) => {
                if pending_key.is_some() {
                    return Err(usage("key pushed twice without a value"));
                }
                *pending_key = Some(key.into());
                Ok(())
            }
            _ => Err(usage("key pushed outside an object")),
        }
    }

    /// Pushes a complete value: an array element, the value for the pending
    /// key, or the whole result when nothing is open.
    pub fn value(&mut self, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            None => {
                if self.result.is_some() {
                    return Err(usage("value pushed after the root was completed"));
                }
                self.result = Some(value);
                Ok(())
            }
            Some(Frame::Array { elems, .. }) => {
                elems.push(value);
                Ok(())
            }
            Some(Frame::Object {
                pairs, pending_key, ..
            }) => match pending_key.take() {
                Some(key) => {
                    pairs.push((key, value));
                    Ok(())
                }
                None => Err(usage("object value pushed without a key")),
            },
        }
    }

    /// Closes the innermost object.
    pub fn end_object(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Object {
                kind,
                pairs,
                pending_key,
            }) => {
                if let Some(key) = pending_key {
                    return Err(usage(&format!("key \"{key}\" has no value")));
                }
                let pairs = canonicalize_pairs(pairs)?;
                let value = match kind {
                    ObjectKind::Plain => Value::Object(pairs),
                    ObjectKind::Vertex => vertex_from_pairs(pairs)?,
                    ObjectKind::Edge => edge_from_pairs(pairs)?,
                };
                self.value(value)
            }
            Some(frame) => {
                self.stack.push(frame);
                Err(usage("end_object with an array open"))
            }
            None => Err(usage("end_object with nothing open")),
        }
    }

    /// Closes the innermost array.
    pub fn end_array(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Array { kind, mut elems }) => {
                let value = match kind {
                    ArrayKind::List => Value::Array(elems),
                    ArrayKind::RawScalar => match elems.pop() {
                        Some(scalar) if elems.is_empty() && scalar.is_scalar() => scalar,
                        _ => {
                            return Err(usage(
                                "raw scalar wrapper must hold exactly one scalar",
                            ));
                        }
                    },
                    ArrayKind::Path => {
                        check_path_shape(&elems)?;
                        Value::Path(elems)
                    }
                };
                self.value(value)
            }
            Some(frame) => {
                self.stack.push(frame);
                Err(usage("end_array with an object open"))
            }
            None => Err(usage("end_array with nothing open")),
        }
    }

    /// Applies one token from an [`Iter`](super::Iter).
    pub fn push_token(&mut self, token: Token) -> Result<()> {
        match token {
            Token::BeginArray { kind, .. } => self.begin_array_with(kind),
            Token::BeginObject { kind, .. } => self.begin_object_with(kind),
            Token::Key(key) => self.key(key),
            Token::Value(value) | Token::Elem(value) => self.value(value),
            Token::EndArray => self.end_array(),
            Token::EndObject => self.end_object(),
        }
    }

    /// Returns the finished value.
    ///
    /// # Errors
    ///
    /// Returns an error if a container is still open or nothing was pushed.
    pub fn finish(self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(usage("finish with an unclosed container"));
        }
        self.result
            .ok_or_else(|| usage("finish with nothing built"))
    }

    fn check_open_slot(&self) -> Result<()> {
        if self.stack.len() == MAX_DEPTH {
            return Err(Error::Capacity(depth_message()));
        }
        match self.stack.last() {
            None if self.result.is_some() => {
                Err(usage("container opened after the root was completed"))
            }
            Some(Frame::Object {
                pending_key: None, ..
            }) => Err(usage("object member opened without a key")),
            _ => Ok(()),
        }
    }
}

fn usage(message: &str) -> Error {
    Error::InvalidValue(format!("builder misuse: {message}"))
}
