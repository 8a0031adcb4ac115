//! Token-level JSON encoder.
//!
//! A [`Writer`] appends tokens to a chunked [`Buffer`]. It does no comma
//! bookkeeping of its own: callers place [`Writer::comma`] between members
//! and elements. Errors are sticky, so a whole encode sequence can run
//! unchecked and the first fault comes back from [`Writer::build_bytes`].

use std::{
    fmt::{self, Write as _},
    io,
    ops::{BitOr, BitOrAssign},
};

use base64::Engine;
use bstr::ByteSlice;

use crate::{
    buffer::{Buffer, ChunkReader},
    error::{EncodeError, Error},
    value::Value,
};

/// Encoding switches. Checked on every call, so they may change between
/// writes on the same writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Encode an absent map as `{}` instead of `null`.
    pub const NIL_MAP_AS_EMPTY: Flags = Flags(1);
    /// Encode an absent sequence as `[]` instead of `null`.
    pub const NIL_SLICE_AS_EMPTY: Flags = Flags(1 << 1);
    /// Emit `<`, `>`, `&`, U+2028 and U+2029 literally.
    pub const NO_ESCAPE_HTML: Flags = Flags(1 << 2);

    #[must_use]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

/// Which kind of container [`Writer::nil_container`] stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Map,
    Slice,
}

const HEX: &[u8; 16] = b"0123456789abcdef";

macro_rules! int_writers {
    ($($name:ident, $name_str:ident => $t:ty;)*) => {$(
        pub fn $name(&mut self, v: $t) {
            self.display(v);
        }

        #[doc = concat!("Writes a `", stringify!($t), "` wrapped in quotes.")]
        pub fn $name_str(&mut self, v: $t) {
            self.put(b'"');
            self.display(v);
            self.put(b'"');
        }
    )*};
}

#[derive(Debug, Default, Clone)]
pub struct Writer {
    buffer: Buffer,
    flags: Flags,
    error: Option<EncodeError>,
}

impl Writer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_flags(flags: Flags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Bytes written so far.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    #[must_use]
    pub fn error(&self) -> Option<&EncodeError> {
        self.error.as_ref()
    }

    /// Records `err` unless an error is already recorded.
    pub fn add_error(&mut self, err: EncodeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    #[inline]
    fn put(&mut self, b: u8) {
        if self.error.is_none() {
            self.buffer.push(b);
        }
    }

    #[inline]
    fn put_all(&mut self, data: &[u8]) {
        if self.error.is_none() {
            self.buffer.extend(data);
        }
    }

    #[inline]
    fn put_str(&mut self, s: &str) {
        self.put_all(s.as_bytes());
    }

    #[inline]
    pub fn raw_byte(&mut self, b: u8) {
        self.put(b);
    }

    /// Appends already-encoded JSON verbatim.
    pub fn raw(&mut self, data: &[u8]) {
        self.put_all(data);
    }

    pub fn raw_string(&mut self, s: &str) {
        self.put_str(s);
    }

    /// Appends the output of a caller's own encoder, or records its error.
    pub fn raw_result<E: fmt::Display>(&mut self, result: Result<&[u8], E>) {
        match result {
            Ok(data) => self.raw(data),
            Err(e) => self.add_error(EncodeError::unsupported(e.to_string())),
        }
    }

    pub fn null(&mut self) {
        self.put_all(b"null");
    }

    pub fn bool(&mut self, v: bool) {
        if v {
            self.put_all(b"true");
        } else {
            self.put_all(b"false");
        }
    }

    pub fn begin_object(&mut self) {
        self.put(b'{');
    }

    pub fn end_object(&mut self) {
        self.put(b'}');
    }

    pub fn begin_array(&mut self) {
        self.put(b'[');
    }

    pub fn end_array(&mut self) {
        self.put(b']');
    }

    pub fn comma(&mut self) {
        self.put(b',');
    }

    pub fn colon(&mut self) {
        self.put(b':');
    }

    fn display(&mut self, v: impl fmt::Display) {
        if self.error.is_none() {
            // Buffer's fmt::Write impl never fails.
            let _ = write!(self.buffer, "{v}");
        }
    }

    /// Writes a finite float in plain decimal, or in exponent form (`1e+21`,
    /// `1e-7`) when its magnitude is below 1e-6 or at least 1e21.
    fn float<F: fmt::Display + fmt::LowerExp>(&mut self, v: F, exponent: bool) {
        if !exponent {
            self.display(v);
            return;
        }
        let text = format!("{v:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => {
                self.put_str(mantissa);
                self.put_all(b"e+");
                self.put_str(exp);
            }
            _ => self.put_str(&text),
        }
    }

    int_writers! {
        i8, i8_str => i8;
        i16, i16_str => i16;
        i32, i32_str => i32;
        i64, i64_str => i64;
        isize, isize_str => isize;
        u8, u8_str => u8;
        u16, u16_str => u16;
        u32, u32_str => u32;
        u64, u64_str => u64;
        usize, usize_str => usize;
    }

    /// Writes the shortest text that parses back to `v`. NaN and infinities
    /// have no JSON form and record [`ErrorKind::UnsupportedValue`].
    ///
    /// [`ErrorKind::UnsupportedValue`]: crate::ErrorKind::UnsupportedValue
    pub fn f64(&mut self, v: f64) {
        if v.is_finite() {
            let abs = v.abs();
            self.float(v, abs != 0.0 && !(1e-6..1e21).contains(&abs));
        } else {
            self.add_error(EncodeError::unsupported(format!("unsupported value: {v}")));
        }
    }

    pub fn f32(&mut self, v: f32) {
        if v.is_finite() {
            let abs = v.abs();
            self.float(v, abs != 0.0 && !(1e-6_f32..1e21_f32).contains(&abs));
        } else {
            self.add_error(EncodeError::unsupported(format!("unsupported value: {v}")));
        }
    }

    pub fn f64_str(&mut self, v: f64) {
        self.put(b'"');
        self.f64(v);
        self.put(b'"');
    }

    pub fn f32_str(&mut self, v: f32) {
        self.put(b'"');
        self.f32(v);
        self.put(b'"');
    }

    /// Writes a quoted, escaped string.
    pub fn string(&mut self, s: &str) {
        self.put(b'"');
        self.escape(s);
        self.put(b'"');
    }

    /// Like [`Writer::string`], for text that may not be valid UTF-8. Each
    /// byte outside a valid sequence is written as `\ufffd`.
    pub fn string_bytes(&mut self, data: &[u8]) {
        self.put(b'"');
        for chunk in ByteSlice::utf8_chunks(data) {
            self.escape(chunk.valid());
            for _ in chunk.invalid() {
                self.put_all(b"\\ufffd");
            }
        }
        self.put(b'"');
    }

    fn escape(&mut self, s: &str) {
        let escape_html = !self.flags.contains(Flags::NO_ESCAPE_HTML);
        let b = s.as_bytes();
        let mut run = 0;
        let mut i = 0;
        while i < b.len() {
            let c = b[i];
            let width = match c {
                b'"' | b'\\' | b'\n' | b'\r' | b'\t' => 1,
                0..0x20 => 1,
                b'<' | b'>' | b'&' if escape_html => 1,
                // U+2028 and U+2029 encode as E2 80 A8 / E2 80 A9.
                0xE2 if escape_html
                    && b.get(i + 1) == Some(&0x80)
                    && matches!(b.get(i + 2), Some(0xA8 | 0xA9)) =>
                {
                    3
                }
                _ => {
                    i += 1;
                    continue;
                }
            };
            self.put_all(&b[run..i]);
            match c {
                b'"' => self.put_all(b"\\\""),
                b'\\' => self.put_all(b"\\\\"),
                b'\n' => self.put_all(b"\\n"),
                b'\r' => self.put_all(b"\\r"),
                b'\t' => self.put_all(b"\\t"),
                0xE2 => {
                    self.put_all(if b[i + 2] == 0xA8 { b"\\u2028" } else { b"\\u2029" });
                }
                _ => self.put_all(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[usize::from(c >> 4)],
                    HEX[usize::from(c & 0xF)],
                ]),
            }
            i += width;
            run = i;
        }
        self.put_all(&b[run..]);
    }

    /// Writes `data` as a quoted standard base64 string.
    pub fn base64_bytes(&mut self, data: &[u8]) {
        self.put(b'"');
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        self.put_str(&encoded);
        self.put(b'"');
    }

    /// Writes the stand-in for an absent map or sequence: `null`, or an
    /// empty container when the matching flag is set.
    pub fn nil_container(&mut self, kind: ContainerKind) {
        match kind {
            ContainerKind::Map if self.flags.contains(Flags::NIL_MAP_AS_EMPTY) => {
                self.put_all(b"{}");
            }
            ContainerKind::Slice if self.flags.contains(Flags::NIL_SLICE_AS_EMPTY) => {
                self.put_all(b"[]");
            }
            _ => self.null(),
        }
    }

    /// Writes a container field that may be absent.
    pub fn nullable_container<T: ?Sized>(
        &mut self,
        kind: ContainerKind,
        value: Option<&T>,
        emit: impl FnOnce(&mut Self, &T),
    ) {
        match value {
            Some(v) => emit(self, v),
            None => self.nil_container(kind),
        }
    }

    /// Writes a dynamic value. Object keys come out in sorted order.
    pub fn value(&mut self, v: &Value) {
        match v {
            Value::Null => self.null(),
            Value::Boolean(b) => self.bool(*b),
            Value::Number(n) => self.f64(*n),
            Value::String(s) => self.string(s),
            Value::Array(items) => {
                self.begin_array();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    }
                    self.value(item);
                }
                self.end_array();
            }
            Value::Object(map) => {
                self.begin_object();
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    }
                    self.string(key);
                    self.colon();
                    self.value(item);
                }
                self.end_object();
            }
        }
    }

    /// Concatenates the output. Leaves the writer untouched, so calling it
    /// again without further writes returns the same bytes.
    pub fn build_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(self.buffer.build()),
        }
    }

    /// Moves the output out and resets the writer (keeping its flags) for
    /// reuse.
    pub fn take_bytes(&mut self) -> Result<Vec<u8>, EncodeError> {
        let bytes = self.buffer.take();
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(bytes),
        }
    }

    /// Drains the output into `sink` and returns the number of bytes it
    /// accepted.
    ///
    /// Nothing is written when an encode error is recorded. A sink failure
    /// reports how many bytes were committed before it; the rest stays in
    /// the writer.
    pub fn write_to<W: io::Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize, Error> {
        if let Some(e) = &self.error {
            return Err(Error::Encode(e.clone()));
        }
        Ok(self.buffer.dump_to(sink)?)
    }

    /// Turns the writer into an [`io::Read`] over its output.
    pub fn into_reader(self) -> Result<ChunkReader, EncodeError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.buffer.into_reader()),
        }
    }
}
