//! String body scanning and unescaping.
//!
//! Invalid UTF-8 is never an error: every byte that is not part of a valid
//! sequence becomes one U+FFFD, so a truncated three-byte sequence yields two.
//! Unpaired surrogate escapes decode to U+FFFD as well.

use std::borrow::Cow;

use bstr::ByteSlice;

use crate::error::ErrorKind;

pub(crate) const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringError {
    pub kind: ErrorKind,
    /// Offset relative to the opening quote.
    pub at: usize,
    pub reason: &'static str,
}

/// Location of a scanned string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    /// Length including both quotes.
    pub len: usize,
    pub escaped: bool,
}

/// Finds the closing quote of the string starting at `b[0] == b'"'`.
pub(crate) fn scan(b: &[u8]) -> Result<Span, StringError> {
    let mut i = 1;
    let mut escaped = false;
    loop {
        match b.get(i) {
            None => {
                return Err(StringError {
                    kind: ErrorKind::UnexpectedEnd,
                    at: i,
                    reason: "unterminated string",
                });
            }
            Some(b'"') => {
                return Ok(Span {
                    len: i + 1,
                    escaped,
                });
            }
            Some(b'\\') => {
                escaped = true;
                i += 2;
            }
            Some(c) if *c < 0x20 => {
                return Err(StringError {
                    kind: ErrorKind::Syntax,
                    at: i,
                    reason: "invalid control character in string",
                });
            }
            Some(_) => i += 1,
        }
    }
}

/// Accumulates four hexadecimal digits of a `\u` escape.
#[derive(Debug, Default)]
struct UnicodeEscape {
    acc: u32,
}

impl UnicodeEscape {
    #[inline]
    fn hex_val(c: u8) -> Option<u32> {
        match c {
            b'0'..=b'9' => Some(u32::from(c - b'0')),
            b'a'..=b'f' => Some(u32::from(c - b'a') + 10),
            b'A'..=b'F' => Some(u32::from(c - b'A') + 10),
            _ => None,
        }
    }

    /// Reads exactly four digits from the start of `b`.
    fn read(mut self, b: &[u8]) -> Option<u32> {
        let digits = b.get(..4)?;
        for &c in digits {
            self.acc = (self.acc << 4) | Self::hex_val(c)?;
        }
        Some(self.acc)
    }
}

fn is_high_surrogate(u: u32) -> bool {
    (0xD800..0xDC00).contains(&u)
}

fn is_low_surrogate(u: u32) -> bool {
    (0xDC00..0xE000).contains(&u)
}

/// Decodes the digits following `\u`. Returns the character and how many
/// bytes after the `\u` it consumed (4, or 10 for a surrogate pair).
fn decode_unicode(rest: &[u8], at: usize) -> Result<(char, usize), StringError> {
    let Some(unit) = UnicodeEscape::default().read(rest) else {
        return Err(StringError {
            kind: ErrorKind::Syntax,
            at,
            reason: "invalid unicode escape",
        });
    };
    if is_high_surrogate(unit) {
        if rest[4..].starts_with(b"\\u") {
            if let Some(low) = UnicodeEscape::default().read(&rest[6..]) {
                if is_low_surrogate(low) {
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return Ok((char::from_u32(code).unwrap_or(REPLACEMENT), 10));
                }
            }
        }
        return Ok((REPLACEMENT, 4));
    }
    Ok((char::from_u32(unit).unwrap_or(REPLACEMENT), 4))
}

pub(crate) fn push_lossy(out: &mut String, raw: &[u8]) {
    for chunk in ByteSlice::utf8_chunks(raw) {
        out.push_str(chunk.valid());
        for _ in chunk.invalid() {
            out.push(REPLACEMENT);
        }
    }
}

/// Borrows `raw` when it is valid UTF-8.
pub(crate) fn lossy(raw: &[u8]) -> Cow<'_, str> {
    match raw.to_str() {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            let mut out = String::with_capacity(raw.len() + 2);
            push_lossy(&mut out, raw);
            Cow::Owned(out)
        }
    }
}

/// Decodes an escaped string body (the bytes between the quotes).
pub(crate) fn unescape(body: &[u8]) -> Result<String, StringError> {
    let mut out = String::with_capacity(body.len());
    unescape_into(body, &mut out)?;
    Ok(out)
}

/// Appends the decoded form of `body` to `out`.
pub(crate) fn unescape_into(body: &[u8], out: &mut String) -> Result<(), StringError> {
    let mut run = 0;
    let mut i = 0;
    while i < body.len() {
        if body[i] != b'\\' {
            i += 1;
            continue;
        }
        push_lossy(out, &body[run..i]);
        let at = i + 1;
        let Some(&esc) = body.get(i + 1) else {
            return Err(StringError {
                kind: ErrorKind::UnexpectedEnd,
                at,
                reason: "unterminated escape",
            });
        };
        i += 2;
        match esc {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let (ch, used) = decode_unicode(&body[i..], at)?;
                out.push(ch);
                i += used;
            }
            _ => {
                return Err(StringError {
                    kind: ErrorKind::Syntax,
                    at,
                    reason: "invalid escape character",
                });
            }
        }
        run = i;
    }
    push_lossy(out, &body[run..]);
    Ok(())
}

/// Checks escapes without building the decoded string.
pub(crate) fn validate(body: &[u8]) -> Result<(), StringError> {
    let mut i = 0;
    while i < body.len() {
        if body[i] != b'\\' {
            i += 1;
            continue;
        }
        let at = i + 1;
        match body.get(i + 1) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => i += 2,
            Some(b'u') => {
                if UnicodeEscape::default().read(&body[i + 2..]).is_none() {
                    return Err(StringError {
                        kind: ErrorKind::Syntax,
                        at,
                        reason: "invalid unicode escape",
                    });
                }
                i += 6;
            }
            Some(_) => {
                return Err(StringError {
                    kind: ErrorKind::Syntax,
                    at,
                    reason: "invalid escape character",
                });
            }
            None => {
                return Err(StringError {
                    kind: ErrorKind::UnexpectedEnd,
                    at,
                    reason: "unterminated escape",
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(br#"\"quoted\""#, "\"quoted\"")]
    #[case(br"a\\b\/c", "a\\b/c")]
    #[case(br"\b\f\n\r\t", "\u{8}\u{c}\n\r\t")]
    #[case("Aé".as_bytes(), "A\u{e9}")]
    #[case(br"<b>", "<b>")]
    #[case("😀".as_bytes(), "\u{1F600}")]
    #[case(br"\ud83d\ude00", "\u{1F600}")]
    #[case(br"\ud83dx", "\u{FFFD}x")]
    #[case(br"\ude00", "\u{FFFD}")]
    #[case(br"\ud83dA", "\u{FFFD}A")]
    fn unescapes(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(unescape(body).unwrap(), expected);
    }

    #[test]
    fn invalid_utf8_next_to_escape() {
        assert_eq!(unescape(b"\xc5\\n\xd1\x82").unwrap(), "\u{FFFD}\n\u{442}");
    }

    #[rstest]
    #[case(b"\xe4\xb8a", "\u{FFFD}\u{FFFD}a")]
    #[case(b"\xff\xfe", "\u{FFFD}\u{FFFD}")]
    #[case(b"a\xf0\x9f\x98", "a\u{FFFD}\u{FFFD}\u{FFFD}")]
    #[case(b"\xed\xa0\x80", "\u{FFFD}\u{FFFD}\u{FFFD}")]
    #[case("ok".as_bytes(), "ok")]
    fn invalid_bytes_replaced_one_by_one(#[case] raw: &[u8], #[case] expected: &str) {
        assert_eq!(lossy(raw), expected);
        let mut out = String::new();
        unescape_into(raw, &mut out).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn valid_input_is_borrowed() {
        assert!(matches!(lossy("тест".as_bytes()), Cow::Borrowed("тест")));
    }

    #[rstest]
    #[case(br"\x", ErrorKind::Syntax)]
    #[case(br"\u12", ErrorKind::Syntax)]
    #[case(br"\u12G4", ErrorKind::Syntax)]
    fn rejects(#[case] body: &[u8], #[case] kind: ErrorKind) {
        assert_eq!(unescape(body).unwrap_err().kind, kind);
        assert_eq!(validate(body).unwrap_err().kind, kind);
    }

    #[test]
    fn scan_finds_closing_quote_past_escapes() {
        let span = scan(br#""a\"b" tail"#).unwrap();
        assert_eq!(span, Span { len: 6, escaped: true });
    }

    #[test]
    fn scan_unterminated() {
        assert_eq!(
            scan(br#""abc"#).unwrap_err().kind,
            ErrorKind::UnexpectedEnd
        );
        assert_eq!(
            scan(br#""abc\"#).unwrap_err().kind,
            ErrorKind::UnexpectedEnd
        );
    }

    #[test]
    fn scan_rejects_raw_control() {
        assert_eq!(scan(b"\"a\nb\"").unwrap_err().kind, ErrorKind::Syntax);
    }
}
