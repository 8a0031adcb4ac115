//! Decode-scoped string deduplication.
//!
//! A cache belongs to exactly one [`Lexer`](crate::Lexer) and is dropped with
//! it. It is never shared between decode calls, so its memory is bounded by
//! the distinct strings of a single input.

use std::{collections::HashSet, sync::Arc};

#[derive(Debug, Default)]
pub struct InternCache {
    strings: HashSet<Arc<str>>,
}

impl InternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance for `s`, inserting a new one on a miss.
    ///
    /// A hit clones the cached `Arc` and allocates nothing.
    pub fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(hit) = self.strings.get(s) {
            return Arc::clone(hit);
        }
        let fresh: Arc<str> = Arc::from(s);
        self.strings.insert(Arc::clone(&fresh));
        fresh
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
