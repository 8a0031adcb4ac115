use std::{fmt, io};

use thiserror::Error;

/// Classification shared by decode, encode and sink failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed token.
    Syntax,
    /// Input exhausted in the middle of a value.
    UnexpectedEnd,
    /// Numeric literal does not fit the requested type.
    NumberOverflow,
    /// Object key not known to the target type while unknown fields are
    /// disallowed.
    UnknownField,
    /// Token kind differs from what the decoder asked for.
    TypeMismatch,
    /// Value that has no JSON representation (e.g. a NaN float).
    UnsupportedValue,
    /// The output sink failed.
    Sink,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UnexpectedEnd => "unexpected end of input",
            ErrorKind::NumberOverflow => "number overflow",
            ErrorKind::UnknownField => "unknown field",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::UnsupportedValue => "unsupported value",
            ErrorKind::Sink => "sink error",
        })
    }
}

/// The first fault recorded by a [`Lexer`](crate::Lexer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error: {reason} near offset {offset} of '{data}'")]
pub struct LexerError {
    pub kind: ErrorKind,
    pub reason: String,
    /// Byte offset into the input where the offending token starts.
    pub offset: usize,
    /// Excerpt of the offending token.
    pub data: String,
}

/// The first fault recorded by a [`Writer`](crate::Writer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("encode error: {reason}")]
pub struct EncodeError {
    pub kind: ErrorKind,
    pub reason: String,
}

impl EncodeError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnsupportedValue,
            reason: reason.into(),
        }
    }
}

/// A sink refused part of the output.
///
/// `written` counts the bytes the sink accepted before failing; those bytes
/// are already committed and cannot be taken back.
#[derive(Error, Debug)]
#[error("sink error after {written} bytes: {source}")]
pub struct SinkError {
    pub written: usize,
    #[source]
    pub source: io::Error,
}

/// Error returned by the `marshal*`/`unmarshal*` entry points.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] LexerError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Decode(e) => e.kind,
            Error::Encode(e) => e.kind,
            Error::Sink(_) => ErrorKind::Sink,
        }
    }

    /// Bytes committed to a sink before the failure, `0` for decode and
    /// encode errors.
    #[must_use]
    pub fn written(&self) -> usize {
        match self {
            Error::Sink(e) => e.written,
            _ => 0,
        }
    }
}
