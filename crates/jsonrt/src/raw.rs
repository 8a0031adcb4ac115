//! Uninterpreted JSON passthrough.

use std::fmt;

use bstr::ByteSlice;

use crate::{
    codec::{Marshaler, Unmarshaler},
    lexer::Lexer,
    writer::Writer,
};

/// Literal JSON bytes, stored on decode and written back verbatim on encode.
///
/// The default value is `null`. An empty message also encodes as `null`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawMessage(Vec<u8>);

impl RawMessage {
    /// Wraps bytes the caller vouches are a single well-formed JSON value.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Default for RawMessage {
    fn default() -> Self {
        Self(b"null".to_vec())
    }
}

impl fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawMessage").field(&self.0.as_bstr()).finish()
    }
}

impl Marshaler for RawMessage {
    fn marshal_json(&self, w: &mut Writer) {
        if self.0.is_empty() {
            w.null();
        } else {
            w.raw(&self.0);
        }
    }
}

impl Unmarshaler for RawMessage {
    fn unmarshal_json(&mut self, l: &mut Lexer<'_>) {
        let raw = l.raw_value();
        if l.ok() {
            self.0.clear();
            self.0.extend_from_slice(raw);
        }
    }
}

/// Serializes the contained value, so a `RawMessage` nested in a serde type
/// comes out as JSON rather than a byte array.
#[cfg(any(test, feature = "serde"))]
impl serde::Serialize for RawMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut lexer = Lexer::new(&self.0);
        let value = lexer.value();
        lexer.consumed();
        match lexer.into_result() {
            Ok(()) => serde::Serialize::serialize(&value, serializer),
            Err(e) => Err(serde::ser::Error::custom(e)),
        }
    }
}

#[cfg(any(test, feature = "serde"))]
impl<'de> serde::Deserialize<'de> for RawMessage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <crate::Value as serde::Deserialize>::deserialize(deserializer)?;
        let mut w = Writer::new();
        w.value(&value);
        w.take_bytes().map(Self).map_err(serde::de::Error::custom)
    }
}
