//! Number scanning and conversion.
//!
//! Scanning follows the RFC 8259 grammar exactly:
//! `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.

use core::{num::IntErrorKind, str::FromStr};

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub kind: ErrorKind,
    pub at: usize,
    pub reason: &'static str,
}

impl ScanError {
    fn end(at: usize) -> Self {
        Self {
            kind: ErrorKind::UnexpectedEnd,
            at,
            reason: "unexpected end of input in number",
        }
    }

    fn syntax(at: usize, reason: &'static str) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            at,
            reason,
        }
    }
}

fn digits(b: &[u8], mut i: usize) -> usize {
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

/// Returns the length of the number at the start of `b`.
pub(crate) fn scan(b: &[u8]) -> Result<usize, ScanError> {
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        None => return Err(ScanError::end(i)),
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = digits(b, i + 1),
        Some(_) => return Err(ScanError::syntax(i, "invalid character in numeric literal")),
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        match b.get(i) {
            None => return Err(ScanError::end(i)),
            Some(c) if c.is_ascii_digit() => i = digits(b, i),
            Some(_) => return Err(ScanError::syntax(i, "expected digit after decimal point")),
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        match b.get(i) {
            None => return Err(ScanError::end(i)),
            Some(c) if c.is_ascii_digit() => i = digits(b, i),
            Some(_) => return Err(ScanError::syntax(i, "expected digit in exponent")),
        }
    }
    Ok(i)
}

#[inline]
pub(crate) fn is_delimiter(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' | b']' | b'}')
}

/// Converts already-scanned numeric text into an integer.
pub(crate) fn parse_int<T>(text: &str) -> Result<T, (ErrorKind, &'static str)>
where
    T: FromStr<Err = core::num::ParseIntError> + Default,
{
    match text.parse::<T>() {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Err((ErrorKind::NumberOverflow, "number out of range for target type"))
            }
            _ if text.contains(['.', 'e', 'E']) => {
                Err((ErrorKind::Syntax, "expected integer, found fractional number"))
            }
            _ => match text.strip_prefix('-') {
                // "-0" is zero for unsigned targets, any other negative overflows.
                Some(rest) if rest.bytes().all(|c| c == b'0') => Ok(T::default()),
                Some(_) => Err((ErrorKind::NumberOverflow, "negative number for unsigned type")),
                None => Err((ErrorKind::Syntax, "invalid integer")),
            },
        },
    }
}

pub(crate) fn parse_float<T>(text: &str) -> Result<T, (ErrorKind, &'static str)>
where
    T: FromStr + Finite,
{
    match text.parse::<T>() {
        Ok(v) if v.finite() => Ok(v),
        Ok(_) => Err((ErrorKind::NumberOverflow, "number out of range for target type")),
        Err(_) => Err((ErrorKind::Syntax, "invalid number")),
    }
}

pub(crate) trait Finite {
    fn finite(&self) -> bool;
}

impl Finite for f32 {
    fn finite(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for f64 {
    fn finite(&self) -> bool {
        self.is_finite()
    }
}
