//! One-call entry points.
//!
//! Each call builds a fresh [`Writer`] or [`Lexer`], runs one encode or
//! decode function against it and reports the first recorded error. Nothing
//! is shared between calls, so calls from different threads never contend.

use std::io;

use thiserror::Error;

use crate::{
    codec::{Marshaler, Unmarshaler},
    error::{Error, ErrorKind},
    lexer::Lexer,
    options::LexerOptions,
    writer::Writer,
};

/// Encodes `value` into a new byte vector.
pub fn marshal<T: Marshaler + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new();
    value.marshal_json(&mut w);
    finish_encode(&w)
}

/// Encodes `value` with a caller-supplied encode function. `None` encodes as
/// `null` without calling `encode`.
pub fn marshal_with<T: ?Sized>(
    value: Option<&T>,
    encode: impl FnOnce(&mut Writer, &T),
) -> Result<Vec<u8>, Error> {
    let mut w = Writer::new();
    match value {
        Some(v) => encode(&mut w, v),
        None => w.null(),
    }
    finish_encode(&w)
}

fn finish_encode(w: &Writer) -> Result<Vec<u8>, Error> {
    w.build_bytes().map_err(|e| {
        tracing::debug!(kind = %e.kind, reason = %e.reason, "marshal failed");
        Error::Encode(e)
    })
}

/// Encodes `value` straight into `sink` and returns the number of bytes
/// written.
pub fn marshal_to_writer<T, W>(value: &T, sink: &mut W) -> Result<usize, Error>
where
    T: Marshaler + ?Sized,
    W: io::Write + ?Sized,
{
    let mut w = Writer::new();
    value.marshal_json(&mut w);
    flush(&mut w, sink)
}

fn flush<W: io::Write + ?Sized>(w: &mut Writer, sink: &mut W) -> Result<usize, Error> {
    match w.write_to(sink) {
        Ok(written) => {
            tracing::trace!(written, "flushed to sink");
            Ok(written)
        }
        Err(e) => {
            if e.written() > 0 {
                tracing::warn!(written = e.written(), error = %e, "sink failed after partial write");
            } else {
                tracing::debug!(error = %e, "marshal to sink failed");
            }
            Err(e)
        }
    }
}

/// An HTTP-style response: a byte sink with headers that must be set before
/// the first body byte.
pub trait ResponseSink: io::Write {
    fn set_header(&mut self, name: &str, value: &str);
}

/// Outcome of a successful [`marshal_to_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed {
    /// Headers were set, so the response can no longer be changed.
    pub started: bool,
    pub written: usize,
}

/// A failed [`marshal_to_response`].
///
/// When `started` is true the headers and `written` body bytes are already
/// committed to the response.
#[derive(Error, Debug)]
#[error("response failed after {written} bytes (started: {started}): {source}")]
pub struct ResponseError {
    pub started: bool,
    pub written: usize,
    #[source]
    pub source: Error,
}

impl ResponseError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Encodes `value` into a response, setting `Content-Type` and
/// `Content-Length` first.
///
/// Encode errors are reported before anything touches the response.
pub fn marshal_to_response<T, S>(value: &T, sink: &mut S) -> Result<Committed, ResponseError>
where
    T: Marshaler + ?Sized,
    S: ResponseSink + ?Sized,
{
    let mut w = Writer::new();
    value.marshal_json(&mut w);
    if let Some(e) = w.error() {
        tracing::debug!(kind = %e.kind, reason = %e.reason, "marshal failed");
        return Err(ResponseError {
            started: false,
            written: 0,
            source: Error::Encode(e.clone()),
        });
    }
    sink.set_header("Content-Type", "application/json");
    sink.set_header("Content-Length", &w.size().to_string());
    match flush(&mut w, sink) {
        Ok(written) => Ok(Committed {
            started: true,
            written,
        }),
        Err(source) => Err(ResponseError {
            started: true,
            written: source.written(),
            source,
        }),
    }
}

/// Decodes `data` into `target`.
///
/// A top-level `null` leaves `target` untouched. Anything but whitespace
/// after the value is an error.
pub fn unmarshal<T: Unmarshaler + ?Sized>(data: &[u8], target: &mut T) -> Result<(), Error> {
    unmarshal_with_options(data, target, LexerOptions::default())
}

pub fn unmarshal_with_options<T: Unmarshaler + ?Sized>(
    data: &[u8],
    target: &mut T,
    options: LexerOptions,
) -> Result<(), Error> {
    run_decode(Lexer::with_options(data, options), target, |l, t| {
        t.unmarshal_json(l);
    })
}

/// Decodes `data` into `target` with a caller-supplied decode function.
pub fn unmarshal_with<T: ?Sized>(
    data: &[u8],
    target: &mut T,
    decode: impl FnOnce(&mut Lexer<'_>, &mut T),
) -> Result<(), Error> {
    run_decode(Lexer::new(data), target, decode)
}

fn run_decode<T: ?Sized>(
    mut lexer: Lexer<'_>,
    target: &mut T,
    decode: impl FnOnce(&mut Lexer<'_>, &mut T),
) -> Result<(), Error> {
    if lexer.is_null() {
        lexer.consume_null();
    } else {
        decode(&mut lexer, target);
    }
    lexer.consumed();
    lexer.into_result().map_err(|e| {
        tracing::debug!(kind = %e.kind, offset = e.offset, reason = %e.reason, "unmarshal failed");
        Error::Decode(e)
    })
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn none_marshals_to_null() {
        assert_eq!(marshal_with::<u8>(None, |_, _| unreachable!()).unwrap(), b"null");
        assert_eq!(marshal(&None::<Box<u8>>).unwrap(), b"null");
    }

    #[test]
    fn top_level_null_leaves_target() {
        let mut v = vec![1u8];
        unmarshal(b" null ", &mut v).unwrap();
        assert_eq!(v, [1]);

        let mut called = false;
        unmarshal_with(b"null", &mut called, |_, c| *c = true).unwrap();
        assert!(!called);
    }

    #[test]
    fn trailing_garbage_fails() {
        let mut v = 0u8;
        let err = unmarshal(b"1 x", &mut v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[traced_test]
    #[test]
    fn decode_failure_is_logged() {
        let mut v = 0u8;
        let err = unmarshal(b"300", &mut v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumberOverflow);
        assert!(logs_contain("unmarshal failed"));
    }

    #[traced_test]
    #[test]
    fn encode_failure_skips_response() {
        struct Recorder {
            headers: Vec<(String, String)>,
            body: Vec<u8>,
        }
        impl io::Write for Recorder {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.body.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        impl ResponseSink for Recorder {
            fn set_header(&mut self, name: &str, value: &str) {
                self.headers.push((name.into(), value.into()));
            }
        }

        let mut rec = Recorder {
            headers: Vec::new(),
            body: Vec::new(),
        };
        let err = marshal_to_response(&f64::NAN, &mut rec).unwrap_err();
        assert!(!err.started);
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
        assert!(rec.headers.is_empty());
        assert!(rec.body.is_empty());
        assert!(logs_contain("marshal failed"));
    }
}
