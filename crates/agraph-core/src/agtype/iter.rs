//! Pull-based token stream over an encoded value.

use agraph_common::utils::error::Result;

use super::container::Agtype;
use super::format::{ArrayKind, ContainerKind, ENTRY_CONTAINER, ObjectKind};
use super::value::Value;

/// One step of a walk over an encoded value.
///
/// Containers open with `BeginArray`/`BeginObject` and close with the
/// matching `End*` token. Object members arrive as a `Key` followed either
/// by a `Value` or by a nested container's tokens. Array members arrive as
/// `Elem` or a nested container. The iterator returning `None` is the end
/// of the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Start of an array with `len` elements.
    BeginArray {
        /// Element count.
        len: usize,
        /// List, raw scalar wrapper, or path.
        kind: ArrayKind,
    },
    /// Start of an object with `len` pairs.
    BeginObject {
        /// Pair count.
        len: usize,
        /// Plain object, vertex, or edge.
        kind: ObjectKind,
    },
    /// An object key.
    Key(String),
    /// A scalar (or skipped container) object value.
    Value(Value),
    /// A scalar (or skipped container) array element.
    Elem(Value),
    /// End of the innermost array.
    EndArray,
    /// End of the innermost object.
    EndObject,
}

struct Frame {
    container: Agtype,
    /// Next position in emission order: for objects, `2 * pair + is_value`.
    pos: usize,
}

impl Frame {
    fn emitted_total(&self) -> usize {
        match self.container.kind() {
            ContainerKind::Object(_) => self.container.count() * 2,
            ContainerKind::Array(_) => self.container.count(),
        }
    }
}

/// Iterator of [`Token`]s.
///
/// Created by [`Agtype::iter`]. Restart a walk by creating a new iterator.
/// In [`skip_nested`](Iter::skip_nested) mode, containers below the root
/// are not entered: each is yielded whole as a [`Value::Binary`] that shares
/// the parent's buffer, so skipping costs the same regardless of its size.
/// After an error the iterator is fused.
pub struct Iter {
    root: Option<Agtype>,
    stack: Vec<Frame>,
    skip_nested: bool,
    failed: bool,
}

impl Iter {
    pub(crate) fn new(root: Agtype) -> Self {
        Self {
            root: Some(root),
            stack: Vec::new(),
            skip_nested: false,
            failed: false,
        }
    }

    /// Yields nested containers as [`Value::Binary`] instead of entering them.
    #[must_use]
    pub fn skip_nested(mut self) -> Self {
        self.skip_nested = true;
        self
    }

    /// Current nesting depth (0 before the root is opened and after it closes).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn open(&mut self, container: Agtype) -> Token {
        let token = match container.kind() {
            ContainerKind::Array(kind) => Token::BeginArray {
                len: container.count(),
                kind,
            },
            ContainerKind::Object(kind) => Token::BeginObject {
                len: container.count(),
                kind,
            },
        };
        self.stack.push(Frame { container, pos: 0 });
        token
    }

    fn step(&mut self) -> Option<Result<Token>> {
        if let Some(root) = self.root.take() {
            return Some(Ok(self.open(root)));
        }
        let skip_nested = self.skip_nested;
        let frame = self.stack.last_mut()?;
        if frame.pos >= frame.emitted_total() {
            let token = match frame.container.kind() {
                ContainerKind::Array(_) => Token::EndArray,
                ContainerKind::Object(_) => Token::EndObject,
            };
            self.stack.pop();
            return Some(Ok(token));
        }

        let pos = frame.pos;
        frame.pos += 1;
        let (index, is_key, in_object) = match frame.container.kind() {
            ContainerKind::Object(_) => {
                let pairs = frame.container.count();
                if pos % 2 == 0 {
                    (pos / 2, true, true)
                } else {
                    (pairs + pos / 2, false, true)
                }
            }
            ContainerKind::Array(_) => (pos, false, false),
        };

        if is_key {
            return Some(frame.container.key_at(index).map(|k| Token::Key(k.to_string())));
        }
        let nested = frame.container.child_type(index) == ENTRY_CONTAINER;
        let value = match frame.container.child_value(index) {
            Ok(value) => value,
            Err(e) => return Some(Err(e)),
        };
        if nested && !skip_nested {
            if let Value::Binary(child) = value {
                return Some(Ok(self.open(child)));
            }
        }
        Some(Ok(if in_object {
            Token::Value(value)
        } else {
            Token::Elem(value)
        }))
    }
}

impl Iterator for Iter {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.step();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agtype::encode;

    fn tokens(a: &Agtype, skip: bool) -> Vec<Token> {
        let it = if skip { a.iter().skip_nested() } else { a.iter() };
        it.collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_scalar_tokens() {
        let a = encode(&Value::from(true)).unwrap();
        assert_eq!(
            tokens(&a, false),
            vec![
                Token::BeginArray {
                    len: 1,
                    kind: ArrayKind::RawScalar
                },
                Token::Elem(Value::Bool(true)),
                Token::EndArray,
            ]
        );
    }

    #[test]
    fn test_nested_tokens() {
        let v = Value::object([
            ("a", Value::array([Value::from(1), Value::Null])),
            ("b", Value::from("x")),
        ])
        .unwrap();
        let a = encode(&v).unwrap();
        assert_eq!(
            tokens(&a, false),
            vec![
                Token::BeginObject {
                    len: 2,
                    kind: ObjectKind::Plain
                },
                Token::Key("a".into()),
                Token::BeginArray {
                    len: 2,
                    kind: ArrayKind::List
                },
                Token::Elem(Value::from(1)),
                Token::Elem(Value::Null),
                Token::EndArray,
                Token::Key("b".into()),
                Token::Value(Value::from("x")),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn test_skip_nested() {
        let inner = Value::array((0..1000).map(Value::from));
        let v = Value::array([inner.clone(), Value::from(2)]);
        let a = encode(&v).unwrap();
        let toks = tokens(&a, true);
        assert_eq!(toks.len(), 4);
        match &toks[1] {
            Token::Elem(Value::Binary(b)) => {
                assert_eq!(b.count(), 1000);
                assert_eq!(b.decode().unwrap(), inner);
            }
            other => panic!("expected skipped container, got {other:?}"),
        }
        assert_eq!(toks[2], Token::Elem(Value::from(2)));
    }

    #[test]
    fn test_restartable() {
        let a = encode(&Value::array([Value::from(1)])).unwrap();
        assert_eq!(tokens(&a, false), tokens(&a, false));
    }

    #[test]
    fn test_depth() {
        let a = encode(&Value::array([Value::array([])])).unwrap();
        let mut it = a.iter();
        assert_eq!(it.depth(), 0);
        it.next();
        assert_eq!(it.depth(), 1);
        it.next();
        assert_eq!(it.depth(), 2);
    }
}
