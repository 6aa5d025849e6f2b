//! Value to text.

use std::fmt::Write;

use agraph_common::utils::error::{Error, Result};

use super::format_timestamp;
use crate::agtype::format::{MAX_DEPTH, depth_message};
use crate::agtype::value::Value;

const INDENT: &str = "    ";

/// Renders a value in the text form.
///
/// With `indent`, every element and pair goes on its own line, indented
/// four spaces per level. [`Value::Binary`] parts are decoded first.
///
/// # Errors
///
/// Returns a corruption error if a [`Value::Binary`] part is malformed, and
/// `Error::Capacity` if containers nest more than [`MAX_DEPTH`] levels deep.
pub fn to_text(value: &Value, indent: bool) -> Result<String> {
    let mut printer = Printer {
        out: String::new(),
        indent,
    };
    printer.value(value, 0)?;
    Ok(printer.out)
}

struct Printer {
    out: String,
    indent: bool,
}

impl Printer {
    fn newline(&mut self, level: usize) {
        if self.indent {
            self.out.push('\n');
            for _ in 0..level {
                self.out.push_str(INDENT);
            }
        }
    }

    fn separator(&mut self) {
        self.out.push_str(if self.indent { "," } else { ", " });
    }

    fn value(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => {
                let _ = write!(self.out, "{i}");
            }
            Value::Float(f) => self.out.push_str(&format_float(*f)),
            Value::Numeric(n) => {
                let _ = write!(self.out, "{n}::numeric");
            }
            Value::Timestamp(t) => match format_timestamp(*t) {
                Some(text) => {
                    escape_string(&text, &mut self.out);
                    self.out.push_str("::timestamp");
                }
                None => {
                    let _ = write!(self.out, "{t}::timestamp");
                }
            },
            Value::String(s) => escape_string(s, &mut self.out),
            Value::Array(elems) => self.array(elems, level)?,
            Value::Path(elems) => {
                self.array(elems, level)?;
                self.out.push_str("::path");
            }
            Value::Object(pairs) => self.object(pairs, level)?,
            Value::Vertex(pairs) => {
                self.object(pairs, level)?;
                self.out.push_str("::vertex");
            }
            Value::Edge(pairs) => {
                self.object(pairs, level)?;
                self.out.push_str("::edge");
            }
            Value::Binary(a) => self.value(&a.decode()?, level)?,
        }
        Ok(())
    }

    fn open(&mut self, bracket: char, level: usize) -> Result<()> {
        if level == MAX_DEPTH {
            return Err(Error::Capacity(depth_message()));
        }
        self.out.push(bracket);
        Ok(())
    }

    fn array(&mut self, elems: &[Value], level: usize) -> Result<()> {
        self.open('[', level)?;
        for (i, elem) in elems.iter().enumerate() {
            if i > 0 {
                self.separator();
            }
            self.newline(level + 1);
            self.value(elem, level + 1)?;
        }
        if !elems.is_empty() {
            self.newline(level);
        }
        self.out.push(']');
        Ok(())
    }

    fn object(&mut self, pairs: &[(String, Value)], level: usize) -> Result<()> {
        self.open('{', level)?;
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                self.separator();
            }
            self.newline(level + 1);
            escape_string(key, &mut self.out);
            self.out.push_str(": ");
            self.value(value, level + 1)?;
        }
        if !pairs.is_empty() {
            self.newline(level);
        }
        self.out.push('}');
        Ok(())
    }
}

/// Formats a float so that re-parsing yields a float again.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let mut text = format!("{f:?}");
    if is_decimal_needed(&text) {
        text.push_str(".0");
    }
    text
}

/// True when `text` is an optional minus sign followed only by digits.
fn is_decimal_needed(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn escape_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agtype::graph::build_vertex;
    use agraph_common::GraphId;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_scalars() {
        assert_eq!(to_text(&Value::Null, false).unwrap(), "null");
        assert_eq!(to_text(&Value::from(-3), false).unwrap(), "-3");
        assert_eq!(to_text(&Value::from(1.0), false).unwrap(), "1.0");
        assert_eq!(to_text(&Value::from(-0.0), false).unwrap(), "-0.0");
        assert_eq!(to_text(&Value::from(0.25), false).unwrap(), "0.25");
        assert_eq!(to_text(&Value::from(1e300), false).unwrap(), "1e300");
        assert_eq!(to_text(&Value::Float(f64::NAN), false).unwrap(), "NaN");
        assert_eq!(
            to_text(&Value::Float(f64::NEG_INFINITY), false).unwrap(),
            "-Infinity"
        );
        let n = BigDecimal::from_str("12.50").unwrap();
        assert_eq!(to_text(&Value::Numeric(n), false).unwrap(), "12.50::numeric");
        assert_eq!(
            to_text(&Value::Timestamp(0), false).unwrap(),
            r#""2000-01-01 00:00:00"::timestamp"#
        );
    }

    #[test]
    fn test_escapes() {
        let s = Value::from("q\"b\\n\n\t\u{1}\u{1f}é");
        assert_eq!(
            to_text(&s, false).unwrap(),
            r#""q\"b\\n\n\t\u0001\u001fé""#
        );
    }

    #[test]
    fn test_containers() {
        let v = Value::object([
            ("list", Value::array([Value::from(1), Value::Null])),
            ("a", Value::empty_object()),
        ])
        .unwrap();
        assert_eq!(
            to_text(&v, false).unwrap(),
            r#"{"a": {}, "list": [1, null]}"#
        );
    }

    #[test]
    fn test_indent() {
        let v = Value::object([("a", Value::array([Value::from(1), Value::from(2)]))]).unwrap();
        assert_eq!(
            to_text(&v, true).unwrap(),
            "{\n    \"a\": [\n        1,\n        2\n    ]\n}"
        );
        assert_eq!(to_text(&Value::array([]), true).unwrap(), "[]");
    }

    #[test]
    fn test_vertex_suffix() {
        let v = build_vertex(GraphId::new(7), "Person", Value::Null).unwrap();
        assert_eq!(
            to_text(&v, false).unwrap(),
            r#"{"id": 7, "label": "Person", "properties": {}}::vertex"#
        );
    }

    #[test]
    fn test_nesting_depth_limit() {
        let nested = |depth: usize| (0..depth).fold(Value::Null, |inner, _| Value::array([inner]));
        let text = to_text(&nested(MAX_DEPTH), false).unwrap();
        assert!(text.starts_with("[[") && text.ends_with("]]"));
        assert!(matches!(
            to_text(&nested(MAX_DEPTH + 1), false),
            Err(Error::Capacity(_))
        ));
    }

    #[test]
    fn test_is_decimal_needed() {
        assert!(is_decimal_needed("12"));
        assert!(is_decimal_needed("-0"));
        assert!(!is_decimal_needed("1.5"));
        assert!(!is_decimal_needed("1e10"));
        assert!(!is_decimal_needed("-"));
    }
}
