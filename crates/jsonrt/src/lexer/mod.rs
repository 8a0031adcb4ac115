//! Token-level JSON decoder.
//!
//! Overview
//! - A [`Lexer`] walks a borrowed input slice with an internal cursor. Callers
//!   (usually generated decode functions) ask for exactly the token they
//!   expect next: a string, a number of some width, a delimiter, and so on.
//! - Strings without escapes are returned as `Cow::Borrowed` slices of the
//!   input. Raw values ([`Lexer::raw_value`]) are always borrowed spans of the
//!   input, which makes raw passthrough zero-copy.
//!
//! Sticky errors
//! - The first fault is recorded and kept. From then on every read returns a
//!   zero value and leaves the cursor where it is, so a long decode sequence
//!   needs a single [`Lexer::error`] check at the end.
//!
//! Interning
//! - [`Lexer::interned_string`] routes strings through an [`InternCache`]
//!   owned by the lexer. The cache is created on first use and dropped with
//!   the lexer; it is never shared across decode calls.

mod literal;
mod number;
mod string;


use std::{borrow::Cow, fmt, sync::Arc};

use base64::Engine;
use bstr::ByteSlice;
use literal::{ExpectedLiteral, Step};

use crate::{
    error::{ErrorKind, LexerError},
    intern::InternCache,
    options::LexerOptions,
    value::{Array, Map, Value},
};

/// Nesting limit for [`Lexer::skip_value`] and [`Lexer::value`].
pub const MAX_DEPTH: usize = 512;

const EXCERPT_LEN: usize = 32;

/// Classification of the next significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    String,
    Number,
    True,
    False,
    Null,
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Comma,
    Colon,
    #[default]
    End,
}

impl TokenKind {
    fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'"' => TokenKind::String,
            b'-' | b'0'..=b'9' => TokenKind::Number,
            b't' => TokenKind::True,
            b'f' => TokenKind::False,
            b'n' => TokenKind::Null,
            b'{' => TokenKind::ObjectOpen,
            b'}' => TokenKind::ObjectClose,
            b'[' => TokenKind::ArrayOpen,
            b']' => TokenKind::ArrayClose,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            _ => return None,
        })
    }

    /// Returns `true` if a JSON value can start with this token.
    #[must_use]
    pub fn is_value_start(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::ObjectOpen
                | TokenKind::ArrayOpen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::True | TokenKind::False => "boolean",
            TokenKind::Null => "null",
            TokenKind::ObjectOpen => "object",
            TokenKind::ObjectClose => "'}'",
            TokenKind::ArrayOpen => "array",
            TokenKind::ArrayClose => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::End => "end of input",
        })
    }
}

fn describe_delim(b: u8) -> &'static str {
    match b {
        b'{' => "object",
        b'[' => "array",
        b'}' => "'}'",
        b']' => "']'",
        b',' => "','",
        b':' => "':'",
        _ => "delimiter",
    }
}

macro_rules! int_readers {
    ($($name:ident, $name_str:ident => $t:ty;)*) => {$(
        #[doc = concat!("Reads a number into `", stringify!($t), "`.")]
        pub fn $name(&mut self) -> $t {
            let text = self.consume_number();
            self.convert(text, number::parse_int::<$t>)
        }

        #[doc = concat!("Reads a quoted number (`\"42\"`) into `", stringify!($t), "`.")]
        pub fn $name_str(&mut self) -> $t {
            let text = self.quoted_number();
            self.convert(&text, number::parse_int::<$t>)
        }
    )*};
}

#[derive(Debug)]
pub struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    token_start: usize,
    error: Option<LexerError>,
    options: LexerOptions,
    intern: Option<InternCache>,
    /// Reused decode target for interned strings that need unescaping.
    scratch: String,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, LexerOptions::default())
    }

    #[must_use]
    pub fn with_options(data: &'a [u8], options: LexerOptions) -> Self {
        Self {
            data,
            pos: 0,
            token_start: 0,
            error: None,
            options,
            intern: None,
            scratch: String::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> LexerOptions {
        self.options
    }

    /// Current cursor offset into the input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The first error recorded, if any.
    #[must_use]
    pub fn error(&self) -> Option<&LexerError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<(), LexerError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Records an error on behalf of the caller. Ignored if an error is
    /// already recorded.
    pub fn add_error(&mut self, kind: ErrorKind, reason: impl Into<String>) {
        let at = self.token_start;
        self.fail_at(kind, reason, at);
    }

    fn fail_at(&mut self, kind: ErrorKind, reason: impl Into<String>, at: usize) {
        if self.error.is_some() {
            return;
        }
        let at = at.min(self.data.len());
        let end = self.pos.max(at + 1).min(self.data.len()).min(at + EXCERPT_LEN);
        self.error = Some(LexerError {
            kind,
            reason: reason.into(),
            offset: at,
            data: self.data[at..end].to_str_lossy().into_owned(),
        });
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.data.get(self.pos) {
            self.pos += 1;
        }
    }

    /// Classifies the next significant byte without consuming it.
    ///
    /// Returns [`TokenKind::End`] when the input is exhausted or an error is
    /// recorded. A byte that cannot start any token records a syntax error.
    pub fn peek_kind(&mut self) -> TokenKind {
        if self.error.is_some() {
            return TokenKind::End;
        }
        self.skip_whitespace();
        let Some(&b) = self.data.get(self.pos) else {
            return TokenKind::End;
        };
        self.token_start = self.pos;
        match TokenKind::from_byte(b) {
            Some(kind) => kind,
            None => {
                self.fail_at(
                    ErrorKind::Syntax,
                    format!("invalid character {:?} looking for beginning of value", b as char),
                    self.pos,
                );
                TokenKind::End
            }
        }
    }

    /// Returns `true` if the next token is the `null` literal. Consumes
    /// nothing.
    pub fn is_null(&mut self) -> bool {
        self.peek_kind() == TokenKind::Null
    }

    /// Returns `true` if the next significant byte is `delim`. Consumes
    /// nothing.
    pub fn is_delim(&mut self, delim: u8) -> bool {
        self.peek_kind();
        self.error.is_none() && self.data.get(self.pos) == Some(&delim)
    }

    /// Records the error for finding `found` where `expected` was needed.
    fn mismatch(&mut self, expected: &str, found: TokenKind) {
        if self.error.is_some() {
            return;
        }
        let at = self.pos;
        match found {
            TokenKind::End => self.fail_at(
                ErrorKind::UnexpectedEnd,
                format!("unexpected end of input, expected {expected}"),
                at,
            ),
            kind if kind.is_value_start() => self.fail_at(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, found {kind}"),
                at,
            ),
            kind => self.fail_at(
                ErrorKind::Syntax,
                format!("expected {expected}, found {kind}"),
                at,
            ),
        }
    }

    /// Consumes the structural byte `delim` (`{`, `}`, `[` or `]`).
    ///
    /// Finding a different value where an object or array was expected is a
    /// type mismatch; anything else out of place is a syntax error.
    pub fn delim(&mut self, delim: u8) {
        let found = self.peek_kind();
        if self.error.is_some() {
            return;
        }
        if self.data.get(self.pos) == Some(&delim) {
            self.pos += 1;
        } else {
            self.mismatch(describe_delim(delim), found);
        }
    }

    /// Consumes `delim`, failing with a syntax error naming the expected and
    /// found bytes.
    pub fn want_delimiter(&mut self, delim: u8) {
        let found = self.peek_kind();
        if self.error.is_some() {
            return;
        }
        match self.data.get(self.pos) {
            Some(b) if *b == delim => self.pos += 1,
            Some(b) => self.fail_at(
                ErrorKind::Syntax,
                format!("expected {:?}, found {:?}", delim as char, *b as char),
                self.pos,
            ),
            None => self.mismatch(describe_delim(delim), found),
        }
    }

    pub fn want_comma(&mut self) {
        self.want_delimiter(b',');
    }

    pub fn want_colon(&mut self) {
        self.want_delimiter(b':');
    }

    /// Advances to element `index` of an open array or object.
    ///
    /// Returns `false` when the closing delimiter `close` is next (it is left
    /// for [`Lexer::delim`]) or an error is recorded. For `index > 0` the
    /// separating comma is consumed.
    pub fn next_item(&mut self, close: u8, index: usize) -> bool {
        match self.peek_kind() {
            TokenKind::End => {
                self.mismatch(describe_delim(close), TokenKind::End);
                return false;
            }
            _ if self.data.get(self.pos) == Some(&close) => return false,
            _ => {}
        }
        if index > 0 {
            self.want_comma();
        }
        self.error.is_none()
    }

    /// Decodes an object, calling `f` with the lexer positioned at the value
    /// of each key. `f` must consume exactly one value.
    pub fn object<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Self, &str),
    {
        self.delim(b'{');
        let mut index = 0;
        while self.next_item(b'}', index) {
            let key = self.field_name();
            self.want_colon();
            if self.error.is_some() {
                return;
            }
            f(self, &key);
            index += 1;
        }
        self.delim(b'}');
    }

    /// Decodes an array, calling `f` with each element index. `f` must
    /// consume exactly one value.
    pub fn array<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Self, usize),
    {
        self.delim(b'[');
        let mut index = 0;
        while self.next_item(b']', index) {
            f(self, index);
            index += 1;
        }
        self.delim(b']');
    }

    /// Reads an object key.
    pub fn field_name(&mut self) -> Cow<'a, str> {
        match self.peek_kind() {
            TokenKind::String => self.consume_string(),
            found => {
                self.mismatch("string for object key", found);
                Cow::Borrowed("")
            }
        }
    }

    /// Scans the string token at the cursor and returns its body span.
    fn scan_string(&mut self) -> Option<(usize, usize, bool)> {
        let found = self.peek_kind();
        if found != TokenKind::String {
            self.mismatch("string", found);
            return None;
        }
        let start = self.pos;
        match string::scan(&self.data[start..]) {
            Ok(span) => {
                self.pos = start + span.len;
                Some((start + 1, start + span.len - 1, span.escaped))
            }
            Err(e) => {
                self.pos = start + e.at;
                self.fail_at(e.kind, e.reason, start);
                None
            }
        }
    }

    /// Decodes a string. Escape-free, valid UTF-8 strings borrow from the
    /// input; anything else is decoded into an owned string.
    pub fn consume_string(&mut self) -> Cow<'a, str> {
        let Some((start, end, escaped)) = self.scan_string() else {
            return Cow::Borrowed("");
        };
        let data: &'a [u8] = self.data;
        let body = &data[start..end];
        if !escaped {
            return string::lossy(body);
        }
        match string::unescape(body) {
            Ok(s) => Cow::Owned(s),
            Err(e) => {
                self.fail_at(e.kind, e.reason, start + e.at);
                Cow::Borrowed("")
            }
        }
    }

    /// Decodes a string into a freshly allocated `String`.
    pub fn string(&mut self) -> String {
        self.consume_string().into_owned()
    }

    /// Decodes a string through the lexer's intern cache. Repeated content
    /// returns the same `Arc` without allocating.
    pub fn interned_string(&mut self) -> Arc<str> {
        let Some((start, end, escaped)) = self.scan_string() else {
            return Arc::default();
        };
        let data: &'a [u8] = self.data;
        let body = &data[start..end];
        let cache = self.intern.get_or_insert_with(InternCache::new);
        if !escaped {
            if let Ok(s) = body.to_str() {
                return cache.intern(s);
            }
        }
        self.scratch.clear();
        let decoded = if escaped {
            string::unescape_into(body, &mut self.scratch)
        } else {
            string::push_lossy(&mut self.scratch, body);
            Ok(())
        };
        match decoded {
            Ok(()) => cache.intern(&self.scratch),
            Err(e) => {
                self.fail_at(e.kind, e.reason, start + e.at);
                Arc::default()
            }
        }
    }

    /// Number of distinct strings held by the intern cache.
    #[must_use]
    pub fn interned_len(&self) -> usize {
        self.intern.as_ref().map_or(0, InternCache::len)
    }

    /// Decodes a base64 (standard alphabet, padded) string. `null` decodes to
    /// an empty vector.
    pub fn bytes(&mut self) -> Vec<u8> {
        if self.is_null() {
            self.consume_null();
            return Vec::new();
        }
        let start = self.pos;
        let s = self.consume_string();
        if self.error.is_some() {
            return Vec::new();
        }
        match base64::engine::general_purpose::STANDARD.decode(s.as_bytes()) {
            Ok(v) => v,
            Err(e) => {
                self.fail_at(ErrorKind::Syntax, format!("invalid base64: {e}"), start);
                Vec::new()
            }
        }
    }

    /// Scans a number and returns its text, leaving conversion to the
    /// caller.
    pub fn consume_number(&mut self) -> &'a str {
        let found = self.peek_kind();
        if found != TokenKind::Number {
            self.mismatch("number", found);
            return "";
        }
        let start = self.pos;
        let data: &'a [u8] = self.data;
        match number::scan(&data[start..]) {
            Ok(len) => {
                self.pos = start + len;
                if data.get(self.pos).is_some_and(|b| !number::is_delimiter(*b)) {
                    self.fail_at(ErrorKind::Syntax, "invalid character after number", start);
                    return "";
                }
                // The scanner only accepts ASCII.
                std::str::from_utf8(&data[start..self.pos]).unwrap_or_default()
            }
            Err(e) => {
                self.pos = start + e.at;
                self.fail_at(e.kind, e.reason, start);
                ""
            }
        }
    }

    /// Reads a string whose content must be a number, as written by the
    /// writer's quoted number methods.
    fn quoted_number(&mut self) -> Cow<'a, str> {
        let start = self.pos;
        let text = self.consume_string();
        if self.error.is_some() {
            return Cow::Borrowed("");
        }
        match number::scan(text.as_bytes()) {
            Ok(len) if len == text.len() => text,
            _ => {
                self.fail_at(ErrorKind::Syntax, "invalid number inside string", start);
                Cow::Borrowed("")
            }
        }
    }

    fn convert<T: Default>(
        &mut self,
        text: &str,
        parse: fn(&str) -> Result<T, (ErrorKind, &'static str)>,
    ) -> T {
        if self.error.is_some() {
            return T::default();
        }
        match parse(text) {
            Ok(v) => v,
            Err((kind, reason)) => {
                let at = self.token_start;
                self.fail_at(kind, reason, at);
                T::default()
            }
        }
    }

    int_readers! {
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

    pub fn f32(&mut self) -> f32 {
        let text = self.consume_number();
        self.convert(text, number::parse_float::<f32>)
    }

    pub fn f32_str(&mut self) -> f32 {
        let text = self.quoted_number();
        self.convert(&text, number::parse_float::<f32>)
    }

    pub fn f64(&mut self) -> f64 {
        let text = self.consume_number();
        self.convert(text, number::parse_float::<f64>)
    }

    pub fn f64_str(&mut self) -> f64 {
        let text = self.quoted_number();
        self.convert(&text, number::parse_float::<f64>)
    }

    /// Matches one of the `null`, `true`, `false` literals.
    fn literal(&mut self, expected: ExpectedLiteral) {
        let start = self.pos;
        match expected.step(&self.data[start..]) {
            Step::Done { len } => {
                self.pos = start + len;
                if self.data.get(self.pos).is_some_and(|b| !number::is_delimiter(*b)) {
                    self.fail_at(ErrorKind::Syntax, "invalid character after literal", start);
                }
            }
            Step::NeedMore => {
                self.pos = self.data.len();
                self.fail_at(ErrorKind::UnexpectedEnd, "unexpected end of input in literal", start);
            }
            Step::Reject { at } => {
                self.pos = start + at + 1;
                self.fail_at(ErrorKind::Syntax, "invalid literal", start);
            }
        }
    }

    pub fn bool(&mut self) -> bool {
        let found = self.peek_kind();
        match found {
            TokenKind::True | TokenKind::False => {
                if let Some(expected) = ExpectedLiteral::from_kind(found) {
                    self.literal(expected);
                }
                self.error.is_none() && found == TokenKind::True
            }
            _ => {
                self.mismatch("boolean", found);
                false
            }
        }
    }

    pub fn consume_null(&mut self) {
        let found = self.peek_kind();
        if found == TokenKind::Null {
            self.literal(ExpectedLiteral::Null);
        } else {
            self.mismatch("null", found);
        }
    }

    /// Consumes and discards one well-formed value of any kind.
    pub fn skip_value(&mut self) {
        self.skip_at(0);
    }

    fn skip_at(&mut self, depth: usize) {
        if depth > MAX_DEPTH {
            let at = self.pos;
            self.fail_at(ErrorKind::Syntax, "exceeded max depth", at);
            return;
        }
        match self.peek_kind() {
            TokenKind::String => {
                if let Some((start, end, true)) = self.scan_string() {
                    if let Err(e) = string::validate(&self.data[start..end]) {
                        self.fail_at(e.kind, e.reason, start + e.at);
                    }
                }
            }
            TokenKind::Number => {
                self.consume_number();
            }
            TokenKind::True | TokenKind::False => {
                self.bool();
            }
            TokenKind::Null => self.consume_null(),
            TokenKind::ObjectOpen => self.object(|lexer, _| lexer.skip_at(depth + 1)),
            TokenKind::ArrayOpen => self.array(|lexer, _| lexer.skip_at(depth + 1)),
            found => self.mismatch("value", found),
        }
    }

    /// Returns the exact bytes of the next value without interpreting it.
    pub fn raw_value(&mut self) -> &'a [u8] {
        self.peek_kind();
        if self.error.is_some() {
            return b"";
        }
        let start = self.pos;
        self.skip_value();
        if self.error.is_some() {
            return b"";
        }
        let data: &'a [u8] = self.data;
        &data[start..self.pos]
    }

    /// Decodes any value into a dynamic [`Value`].
    pub fn value(&mut self) -> Value {
        self.value_at(0)
    }

    fn value_at(&mut self, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            let at = self.pos;
            self.fail_at(ErrorKind::Syntax, "exceeded max depth", at);
            return Value::Null;
        }
        match self.peek_kind() {
            TokenKind::String => Value::String(self.string()),
            TokenKind::Number => Value::Number(self.f64()),
            TokenKind::True | TokenKind::False => Value::Boolean(self.bool()),
            TokenKind::Null => {
                self.consume_null();
                Value::Null
            }
            TokenKind::ObjectOpen => {
                let mut map = Map::new();
                self.object(|lexer, key| {
                    let v = lexer.value_at(depth + 1);
                    map.insert(key.to_owned(), v);
                });
                Value::Object(map)
            }
            TokenKind::ArrayOpen => {
                let mut array = Array::new();
                self.array(|lexer, _| array.push(lexer.value_at(depth + 1)));
                Value::Array(array)
            }
            found => {
                self.mismatch("value", found);
                Value::Null
            }
        }
    }

    /// Skips the value of a key the target type does not know, or rejects it
    /// when unknown fields are disallowed.
    pub fn skip_unknown(&mut self, key: &str) {
        if self.options.disallow_unknown_fields {
            self.reject_unknown(key);
        } else {
            self.skip_value();
        }
    }

    /// Records an [`ErrorKind::UnknownField`] error for `key`.
    pub fn reject_unknown(&mut self, key: &str) {
        self.peek_kind();
        let at = self.pos;
        self.skip_value();
        tracing::trace!(key, offset = at, "rejecting unknown field");
        self.fail_at(ErrorKind::UnknownField, format!("unknown field {key:?}"), at);
    }

    /// Requires that only whitespace remains after the top-level value.
    pub fn consumed(&mut self) {
        if self.error.is_some() {
            return;
        }
        self.skip_whitespace();
        if self.pos < self.data.len() {
            let at = self.pos;
            self.fail_at(ErrorKind::Syntax, "invalid character after top-level value", at);
        }
    }
}
