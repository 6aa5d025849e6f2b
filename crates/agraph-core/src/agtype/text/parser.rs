//! Recursive-descent parser for the agtype text form.

use std::str::FromStr;

use agraph_common::utils::error::{Error, QueryError, QueryErrorKind, Result, SourceSpan};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::lexer::{Lexer, Token, TokenKind};
use super::parse_timestamp;
use crate::agtype::format::{MAX_DEPTH, depth_message};
use crate::agtype::graph::{check_path_shape, edge_from_pairs, vertex_from_pairs};
use crate::agtype::value::{Value, canonicalize_pairs};

/// Parses the text form into a value.
///
/// # Errors
///
/// Returns `Error::Query` with the position of the offending input for
/// malformed text, duplicate keys, unknown annotations, and annotations
/// whose value does not have the required shape, and containers nested
/// more than [`MAX_DEPTH`] levels deep.
pub fn from_text(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    let trailing = parser.next()?;
    if trailing.kind != TokenKind::Eof {
        return Err(parser.syntax(trailing.span, "unexpected trailing input"));
    }
    Ok(value)
}

/// A literal before any annotation is applied.
enum Literal {
    Value(Value),
    /// Numbers stay textual until the annotation (if any) picks their type.
    Number(String),
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    source: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            source: input,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        match &self.peeked {
            Some(tok) => Ok(tok),
            None => Err(Error::Internal("token buffer empty after fill".to_string())),
        }
    }

    fn next(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.lexer.next_token(),
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token> {
        let tok = self.next()?;
        if &tok.kind == kind {
            Ok(tok)
        } else {
            Err(self.syntax(tok.span, &format!("expected {what}")))
        }
    }

    fn syntax(&self, span: SourceSpan, message: &str) -> Error {
        self.error_at(span, QueryErrorKind::Syntax, message)
    }

    fn error_at(&self, span: SourceSpan, kind: QueryErrorKind, message: &str) -> Error {
        Error::Query(
            QueryError::new(kind, message)
                .with_span(span)
                .with_source(self.source.to_string()),
        )
    }

    fn span_between(start: SourceSpan, end: SourceSpan) -> SourceSpan {
        SourceSpan::new(start.start, end.end, start.line, start.column)
    }

    fn parse_value(&mut self) -> Result<Value> {
        let tok = self.next()?;
        let start = tok.span;
        let literal = match tok.kind {
            TokenKind::LBrace => Literal::Value(self.nested(start, |p| p.parse_object(start))?),
            TokenKind::LBracket => Literal::Value(self.nested(start, Self::parse_array)?),
            TokenKind::String(s) => Literal::Value(Value::String(s)),
            TokenKind::Number(n) => Literal::Number(n),
            TokenKind::Ident(word) => Literal::Value(self.parse_word(&word, start)?),
            TokenKind::Eof => {
                return Err(self.syntax(start, "unexpected end of input"));
            }
            _ => return Err(self.syntax(start, "expected a value")),
        };

        if self.peek()?.kind != TokenKind::DoubleColon {
            return match literal {
                Literal::Value(v) => Ok(v),
                Literal::Number(n) => self.number(&n, start),
            };
        }
        self.next()?;
        let name_tok = self.next()?;
        let TokenKind::Ident(name) = name_tok.kind else {
            return Err(self.syntax(name_tok.span, "expected annotation name"));
        };
        let span = Self::span_between(start, name_tok.span);
        self.annotate(literal, &name.to_ascii_lowercase(), span)
    }

    fn nested(
        &mut self,
        span: SourceSpan,
        parse: impl FnOnce(&mut Self) -> Result<Value>,
    ) -> Result<Value> {
        if self.depth == MAX_DEPTH {
            return Err(self.syntax(span, &depth_message()));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_word(&self, word: &str, span: SourceSpan) -> Result<Value> {
        match word {
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "NaN" => Ok(Value::Float(f64::NAN)),
            "Infinity" => Ok(Value::Float(f64::INFINITY)),
            "-Infinity" => Ok(Value::Float(f64::NEG_INFINITY)),
            _ => Err(self.syntax(span, &format!("unexpected word \"{word}\""))),
        }
    }

    fn parse_object(&mut self, start: SourceSpan) -> Result<Value> {
        let mut pairs = Vec::new();
        if self.peek()?.kind == TokenKind::RBrace {
            self.next()?;
            return Ok(Value::Object(pairs));
        }
        loop {
            let key_tok = self.next()?;
            let TokenKind::String(key) = key_tok.kind else {
                return Err(self.syntax(key_tok.span, "expected string key"));
            };
            self.expect(&TokenKind::Colon, "':'")?;
            let value = self.parse_value()?;
            pairs.push((key, value));

            let sep = self.next()?;
            match sep.kind {
                TokenKind::Comma => {}
                TokenKind::RBrace => {
                    let span = Self::span_between(start, sep.span);
                    return canonicalize_pairs(pairs)
                        .map(Value::Object)
                        .map_err(|e| self.syntax(span, &e.to_string()));
                }
                _ => return Err(self.syntax(sep.span, "expected ',' or '}'")),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        let mut elems = Vec::new();
        if self.peek()?.kind == TokenKind::RBracket {
            self.next()?;
            return Ok(Value::Array(elems));
        }
        loop {
            elems.push(self.parse_value()?);
            let sep = self.next()?;
            match sep.kind {
                TokenKind::Comma => {}
                TokenKind::RBracket => return Ok(Value::Array(elems)),
                _ => return Err(self.syntax(sep.span, "expected ',' or ']'")),
            }
        }
    }

    /// Untyped number: integer if it has no fraction or exponent, else float.
    fn number(&self, lexeme: &str, span: SourceSpan) -> Result<Value> {
        if lexeme.contains(['.', 'e', 'E']) {
            return lexeme
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.syntax(span, "invalid float"));
        }
        lexeme.parse::<i64>().map(Value::Integer).map_err(|_| {
            self.syntax(
                span,
                &format!("value \"{lexeme}\" is out of range for type integer"),
            )
        })
    }

    fn annotate(&self, literal: Literal, name: &str, span: SourceSpan) -> Result<Value> {
        let invalid = |msg: &str| self.error_at(span, QueryErrorKind::Annotation, msg);
        let value = match literal {
            Literal::Number(n) => return self.annotate_number(&n, name, span),
            Literal::Value(v) => v,
        };
        match value {
            Value::Object(pairs) => match name {
                "vertex" => vertex_from_pairs(pairs).map_err(|e| invalid(&e.to_string())),
                "edge" => edge_from_pairs(pairs).map_err(|e| invalid(&e.to_string())),
                _ => Err(invalid("invalid annotation value for object")),
            },
            Value::Array(elems) => match name {
                "path" => {
                    check_path_shape(&elems).map_err(|e| invalid(&e.to_string()))?;
                    Ok(Value::Path(elems))
                }
                _ => Err(invalid("invalid annotation value for array")),
            },
            Value::Null => match name {
                "numeric" | "integer" | "float" | "timestamp" => Ok(Value::Null),
                _ => Err(invalid("invalid annotation value for scalar")),
            },
            scalar => self.cast_scalar(scalar, name, span),
        }
    }

    fn annotate_number(&self, lexeme: &str, name: &str, span: SourceSpan) -> Result<Value> {
        let invalid = |msg: &str| self.error_at(span, QueryErrorKind::Annotation, msg);
        match name {
            "numeric" => BigDecimal::from_str(lexeme)
                .map(Value::Numeric)
                .map_err(|_| invalid("invalid numeric literal")),
            "integer" | "float" | "timestamp" => {
                let value = self.number(lexeme, span)?;
                self.cast_scalar(value, name, span)
            }
            _ => Err(invalid("invalid annotation value for scalar")),
        }
    }

    fn cast_scalar(&self, value: Value, name: &str, span: SourceSpan) -> Result<Value> {
        let fail = |what: &str| {
            self.error_at(
                span,
                QueryErrorKind::Annotation,
                &format!("cannot cast {} to {name}: {what}", value.type_name()),
            )
        };
        let cast = match (name, &value) {
            ("numeric", Value::Integer(i)) => Some(Value::Numeric(BigDecimal::from(*i))),
            ("numeric", Value::Float(f)) => {
                BigDecimal::from_str(&f.to_string()).ok().map(Value::Numeric)
            }
            ("numeric", Value::Numeric(_)) => Some(value.clone()),
            ("numeric", Value::String(s)) => {
                BigDecimal::from_str(s.trim()).ok().map(Value::Numeric)
            }

            ("integer", Value::Integer(_)) => Some(value.clone()),
            ("integer", Value::Float(f)) => float_to_i64(*f).map(Value::Integer),
            ("integer", Value::Numeric(n)) => numeric_to_i64(n).map(Value::Integer),
            ("integer", Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Integer),

            ("float", Value::Integer(i)) => Some(Value::Float(*i as f64)),
            ("float", Value::Float(_)) => Some(value.clone()),
            ("float", Value::Numeric(n)) => n.to_f64().map(Value::Float),
            ("float", Value::String(s)) => parse_float_text(s.trim()).map(Value::Float),

            ("timestamp", Value::Integer(i)) => Some(Value::Timestamp(*i)),
            ("timestamp", Value::Timestamp(_)) => Some(value.clone()),
            ("timestamp", Value::String(s)) => parse_timestamp(s.trim()).map(Value::Timestamp),

            ("numeric" | "integer" | "float" | "timestamp", _) => None,
            _ => {
                return Err(self.error_at(
                    span,
                    QueryErrorKind::Annotation,
                    "invalid annotation value for scalar",
                ));
            }
        };
        cast.ok_or_else(|| fail("value out of range or malformed"))
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    let rounded = f.round();
    // i64::MAX is not exactly representable; 2^63 is the first value out of range.
    let limit = 9_223_372_036_854_775_808.0;
    if rounded.is_finite() && rounded >= -limit && rounded < limit {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Rounds half away from zero, like [`f64::round`].
fn numeric_to_i64(n: &BigDecimal) -> Option<i64> {
    let half = BigDecimal::new(BigInt::from(5), 1);
    let shifted = if *n < BigDecimal::from(0) { n - &half } else { n + &half };
    shifted.with_scale(0).to_i64()
}

fn parse_float_text(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => s.parse().ok(),
    }
}
