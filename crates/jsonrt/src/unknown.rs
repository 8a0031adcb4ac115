//! Capture of object members a decoder does not recognise.
//!
//! A type that wants round-trip fidelity embeds [`UnknownFields`] next to its
//! known fields. Its decode loop hands unmatched keys to
//! [`UnknownFields::capture`]; its encode path calls
//! [`UnknownFields::emit_all`] after the known fields.

use crate::{lexer::Lexer, writer::Writer};

/// Raw JSON of unrecognised members, in first-seen order.
///
/// Values are copied out of the input, so they outlive the decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownFields {
    fields: Vec<(String, Vec<u8>)>,
}

impl UnknownFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the raw value following `key`.
    ///
    /// A repeated key replaces the stored value but keeps its original
    /// position. When the lexer disallows unknown fields nothing is stored and
    /// an [`ErrorKind::UnknownField`](crate::ErrorKind::UnknownField) error is
    /// recorded instead.
    pub fn capture(&mut self, key: &str, lexer: &mut Lexer<'_>) {
        if lexer.options().disallow_unknown_fields {
            lexer.reject_unknown(key);
            return;
        }
        let raw = lexer.raw_value();
        if !lexer.ok() {
            return;
        }
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => {
                slot.clear();
                slot.extend_from_slice(raw);
            }
            None => self.fields.push((key.to_owned(), raw.to_vec())),
        }
    }

    /// Writes every captured member as `"key":raw`, separated by commas.
    ///
    /// `first` says whether nothing has been written into the enclosing
    /// object yet. Returns `true` if at least one member has been written
    /// once this call is done, by it or before it.
    pub fn emit_all(&self, w: &mut Writer, first: bool) -> bool {
        let mut first = first;
        for (key, raw) in &self.fields {
            if !first {
                w.comma();
            }
            first = false;
            w.string(key);
            w.colon();
            w.raw(raw);
        }
        !first
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}
