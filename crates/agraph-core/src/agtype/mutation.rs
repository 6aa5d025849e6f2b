//! Copy-on-write property updates.

use agraph_common::utils::error::{Error, Result};

use super::builder::ValueBuilder;
use super::container::Agtype;
use super::encode::encode;
use super::format::ObjectKind;
use super::iter::Token;
use super::value::Value;

/// Returns a copy of the `properties` object with `key` set, replaced, or
/// removed.
///
/// The key is dropped when `remove` is set or `new_value` is `None`.
/// Otherwise its value is replaced, or the pair is added when the key is
/// missing. Nested containers of the input are carried over as encoded
/// slices without being decoded.
///
/// # Errors
///
/// Returns a type error unless `properties` is a plain object.
///
/// # Examples
///
/// ```
/// use agraph_core::agtype::{alter_property, encode, from_text};
///
/// let props = encode(&from_text(r#"{"a": 1, "b": 2}"#)?)?;
/// let five = encode(&from_text("5")?)?;
/// let updated = alter_property(&props, "b", Some(&five), false)?;
/// assert_eq!(updated.to_text(false)?, r#"{"a": 1, "b": 5}"#);
/// # Ok::<(), agraph_common::Error>(())
/// ```
pub fn alter_property(
    properties: &Agtype,
    key: &str,
    new_value: Option<&Agtype>,
    remove: bool,
) -> Result<Agtype> {
    if !properties.is_plain_object() {
        return Err(Error::Type("can only update objects".to_string()));
    }
    let replacement = match new_value {
        Some(value) if !remove => Some(match value.scalar()? {
            Some(scalar) => scalar,
            None => Value::Binary(value.clone()),
        }),
        _ => None,
    };

    let mut builder = ValueBuilder::new();
    let mut skip_value = false;
    let mut replaced = false;
    for token in properties.iter().skip_nested() {
        match token? {
            Token::BeginObject {
                kind: ObjectKind::Plain,
                ..
            } => builder.begin_object()?,
            Token::Key(k) if k == key => {
                if let Some(v) = &replacement {
                    builder.key(k)?;
                    builder.value(v.clone())?;
                    replaced = true;
                }
                skip_value = true;
            }
            Token::Value(_) if skip_value => skip_value = false,
            Token::EndObject => {
                if let Some(v) = replacement.as_ref().filter(|_| !replaced) {
                    builder.key(key)?;
                    builder.value(v.clone())?;
                }
                builder.end_object()?;
            }
            other => builder.push_token(other)?,
        }
    }
    encode(&builder.finish()?)
}

/// [`alter_property`] over decoded values.
///
/// # Errors
///
/// Returns a type error unless `properties` is an object.
pub fn alter_property_value(
    properties: &Value,
    key: &str,
    new_value: Option<&Value>,
    remove: bool,
) -> Result<Value> {
    let resolved;
    let properties = match properties {
        Value::Binary(a) => {
            resolved = a.decode()?;
            &resolved
        }
        other => other,
    };
    let Value::Object(pairs) = properties else {
        return Err(Error::Type("can only update objects".to_string()));
    };
    let mut pairs: Vec<(String, Value)> =
        pairs.iter().filter(|(k, _)| k != key).cloned().collect();
    if let Some(v) = new_value.filter(|_| !remove) {
        pairs.push((key.to_string(), v.clone()));
    }
    Value::object(pairs)
}
