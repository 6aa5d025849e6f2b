//! Error types for agraph.
//!
//! Errors fall into two groups. Syntax, type, capacity, and invalid-value
//! errors describe a bad request and abort only the call that raised them.
//! Corruption and internal errors mean an encoded buffer or a cache load
//! broke an invariant; the current unit of work must be abandoned.

use std::fmt;

/// Result type alias for agraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for agraph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed text input.
    #[error("{0}")]
    Query(QueryError),

    /// Operation applied to the wrong kind of value.
    #[error("type error: {0}")]
    Type(String),

    /// A string or container exceeds what the binary format can represent.
    #[error("value too large: {0}")]
    Capacity(String),

    /// A value violates a structural rule (duplicate key, malformed path).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// An encoded buffer is inconsistent with its own headers.
    #[error("corrupt agtype: {0}")]
    Corruption(String),

    /// A broken invariant inside the graph cache.
    #[error("internal error: {0}")]
    Internal(String),

    /// Framing problem in the versioned wire encoding.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed text.
    Syntax,
    /// Wrong value variant.
    Type,
    /// Encodable bounds exceeded.
    Capacity,
    /// Structural rule violated.
    InvalidValue,
    /// Encoded buffer inconsistent.
    Corruption,
    /// Cache invariant violated.
    Internal,
    /// Wire framing problem.
    Serialization,
    /// I/O failure.
    Io,
}

impl Error {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Query(_) => ErrorKind::Syntax,
            Error::Type(_) => ErrorKind::Type,
            Error::Capacity(_) => ErrorKind::Capacity,
            Error::InvalidValue(_) => ErrorKind::InvalidValue,
            Error::Corruption(_) => ErrorKind::Corruption,
            Error::Internal(_) => ErrorKind::Internal,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if the caller may continue with other work.
    ///
    /// Corruption and internal errors are never recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Corruption | ErrorKind::Internal)
    }
}

/// Error raised while reading the text form.
#[derive(Debug, Clone)]
pub struct QueryError {
    /// What went wrong.
    pub kind: QueryErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Location of the offending input.
    pub span: Option<SourceSpan>,
    /// The full input, kept for rendering.
    pub source_text: Option<String>,
}

impl QueryError {
    /// Creates a new error with no location.
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            source_text: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Attaches the input text.
    #[must_use]
    pub fn with_source(mut self, source: String) -> Self {
        self.source_text = Some(source);
        self
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(span) = &self.span {
            write!(f, " at line {}, column {}", span.line, span.column)?;
            if let Some(source) = &self.source_text {
                let end = span.end.min(source.len()).max(span.start);
                if let Some(fragment) = source.get(span.start..end) {
                    if !fragment.is_empty() {
                        write!(f, " near \"{fragment}\"")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {}

/// Category of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Bad token (unterminated string, bad escape, stray character).
    Lexer,
    /// Tokens in an order the grammar does not allow.
    Syntax,
    /// Well-formed text that names an unknown or mismatched annotation.
    Annotation,
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryErrorKind::Lexer => write!(f, "lexer error"),
            QueryErrorKind::Syntax => write!(f, "syntax error"),
            QueryErrorKind::Annotation => write!(f, "annotation error"),
        }
    }
}

/// Byte range of some input text, plus the 1-based line and column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line of `start`.
    pub line: u32,
    /// Column of `start`.
    pub column: u32,
}

impl SourceSpan {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl From<QueryError> for Error {
    fn from(e: QueryError) -> Self {
        Error::Query(e)
    }
}
