use super::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpectedLiteral {
    Null,
    True,
    False,
}

/// Outcome of matching a literal against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The whole literal matched; `len` bytes belong to it.
    Done { len: usize },
    /// The input ended inside the literal.
    NeedMore,
    /// Byte at `at` does not belong to the literal.
    Reject { at: usize },
}

impl ExpectedLiteral {
    pub(crate) fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Null => Some(ExpectedLiteral::Null),
            TokenKind::True => Some(ExpectedLiteral::True),
            TokenKind::False => Some(ExpectedLiteral::False),
            _ => None,
        }
    }

    pub(crate) fn bytes(self) -> &'static [u8] {
        match self {
            ExpectedLiteral::Null => b"null",
            ExpectedLiteral::True => b"true",
            ExpectedLiteral::False => b"false",
        }
    }

    /// Matches the literal at the start of `input`.
    pub(crate) fn step(self, input: &[u8]) -> Step {
        let expected = self.bytes();
        for (at, want) in expected.iter().enumerate() {
            match input.get(at) {
                None => return Step::NeedMore,
                Some(b) if b == want => {}
                Some(_) => return Step::Reject { at },
            }
        }
        Step::Done {
            len: expected.len(),
        }
    }
}
