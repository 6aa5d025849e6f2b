//! Tokenizer for the agtype text form.

use agraph_common::utils::error::{Error, QueryError, QueryErrorKind, Result, SourceSpan};

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    DoubleColon,
    Comma,
    /// Decoded string contents.
    String(String),
    /// Raw numeric lexeme; its type is decided by the parser.
    Number(String),
    /// Bare word: literals and annotation names.
    Ident(String),
    Eof,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn span_from(&self, start: usize, line: u32, column: u32) -> SourceSpan {
        SourceSpan::new(start, self.pos, line, column)
    }

    fn column_of(&self, pos: usize) -> u32 {
        (pos - self.line_start + 1) as u32
    }

    fn error(&self, start: usize, message: &str) -> Error {
        let end = self.pos.max(start + 1);
        let span = SourceSpan::new(start, end, self.line, self.column_of(start));
        Error::Query(
            QueryError::new(QueryErrorKind::Lexer, message)
                .with_span(span)
                .with_source(self.input.to_string()),
        )
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            match b {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Returns the next token; `Eof` repeats once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let line = self.line;
        let column = self.column_of(start);

        let Some(b) = self.peek_byte() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: self.span_from(start, line, column),
            });
        };

        let kind = match b {
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b',' => self.single(TokenKind::Comma),
            b':' => {
                if self.peek_byte_at(1) == Some(b':') {
                    self.pos += 2;
                    TokenKind::DoubleColon
                } else {
                    self.single(TokenKind::Colon)
                }
            }
            b'"' => TokenKind::String(self.lex_string()?),
            b'-' if self.peek_byte_at(1).is_some_and(|c| c.is_ascii_alphabetic()) => {
                self.pos += 1;
                self.lex_word();
                TokenKind::Ident(self.input[start..self.pos].to_string())
            }
            b'-' | b'0'..=b'9' => TokenKind::Number(self.lex_number()?),
            c if c.is_ascii_alphabetic() || c == b'_' => {
                self.lex_word();
                TokenKind::Ident(self.input[start..self.pos].to_string())
            }
            _ => {
                let ch = self.input[start..].chars().next().unwrap_or('?');
                self.pos += ch.len_utf8();
                return Err(self.error(start, &format!("unexpected character '{ch}'")));
            }
        };

        Ok(Token {
            kind,
            span: self.span_from(start, line, column),
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn lex_word(&mut self) {
        while self
            .peek_byte()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek_byte().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn lex_number(&mut self) -> Result<String> {
        let start = self.pos;
        if self.peek_byte() == Some(b'-') {
            self.pos += 1;
        }
        let int_start = self.pos;
        if self.eat_digits() == 0 {
            return Err(self.error(start, "expected digits after '-'"));
        }
        if self.bytes[int_start] == b'0' && self.pos - int_start > 1 {
            return Err(self.error(start, "leading zeros are not allowed"));
        }
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            if self.eat_digits() == 0 {
                return Err(self.error(start, "expected digits after decimal point"));
            }
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                return Err(self.error(start, "expected digits in exponent"));
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn lex_string(&mut self) -> Result<String> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let chunk_start = self.pos;
            while self
                .peek_byte()
                .is_some_and(|c| c != b'"' && c != b'\\' && c >= 0x20)
            {
                self.pos += 1;
            }
            out.push_str(&self.input[chunk_start..self.pos]);

            match self.peek_byte() {
                None => return Err(self.error(start, "unterminated string")),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    let Some(esc) = self.peek_byte() else {
                        return Err(self.error(start, "unterminated string"));
                    };
                    self.pos += 1;
                    match esc {
                        b'"' => out.push('"'),
                        b'\\' => out.push('\\'),
                        b'/' => out.push('/'),
                        b'b' => out.push('\u{8}'),
                        b'f' => out.push('\u{c}'),
                        b'n' => out.push('\n'),
                        b'r' => out.push('\r'),
                        b't' => out.push('\t'),
                        b'u' => out.push(self.lex_unicode_escape(escape_start)?),
                        _ => {
                            return Err(self.error(escape_start, "invalid escape sequence"));
                        }
                    }
                }
                Some(_) => {
                    return Err(self.error(self.pos, "control character in string"));
                }
            }
        }
    }

    fn read_hex4(&mut self, escape_start: usize) -> Result<u16> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error(escape_start, "truncated unicode escape"))?;
        let value = u16::from_str_radix(digits, 16)
            .map_err(|_| self.error(escape_start, "invalid unicode escape"))?;
        self.pos += 4;
        Ok(value)
    }

    fn lex_unicode_escape(&mut self, escape_start: usize) -> Result<char> {
        let high = self.read_hex4(escape_start)?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if self.peek_byte() != Some(b'\\') || self.peek_byte_at(1) != Some(b'u') {
                return Err(self.error(escape_start, "unpaired surrogate in unicode escape"));
            }
            self.pos += 2;
            let low = self.read_hex4(escape_start)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error(escape_start, "invalid low surrogate in unicode escape"));
            }
            0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
        } else {
            u32::from(high)
        };
        if code == 0 {
            return Err(self.error(escape_start, "\\u0000 cannot be represented"));
        }
        char::from_u32(code).ok_or_else(|| self.error(escape_start, "invalid unicode escape"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            if tok.kind == TokenKind::Eof {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn test_punctuation_and_annotation() {
        assert_eq!(
            kinds(r#"{"a": 1}::vertex"#),
            vec![
                TokenKind::LBrace,
                TokenKind::String("a".into()),
                TokenKind::Colon,
                TokenKind::Number("1".into()),
                TokenKind::RBrace,
                TokenKind::DoubleColon,
                TokenKind::Ident("vertex".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("-12 3.5 1e10 2.5E-3 -Infinity"),
            vec![
                TokenKind::Number("-12".into()),
                TokenKind::Number("3.5".into()),
                TokenKind::Number("1e10".into()),
                TokenKind::Number("2.5E-3".into()),
                TokenKind::Ident("-Infinity".into()),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\né😀""#),
            vec![TokenKind::String("a\"b\\c\né😀".into())]
        );
    }

    #[test]
    fn test_lexer_errors() {
        for bad in [r#""abc"#, r#""\x""#, "01", "1.", "-", "@", "\"a\u{1}\"", r#""\ud800""#] {
            let mut lexer = Lexer::new(bad);
            assert!(lexer.next_token().is_err(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn test_span_line_and_column() {
        let mut lexer = Lexer::new("[\n  true]");
        lexer.next_token().unwrap();
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Ident("true".into()));
        assert_eq!(tok.span.line, 2);
        assert_eq!(tok.span.column, 3);
        assert_eq!(tok.span.start, 4);
    }
}
