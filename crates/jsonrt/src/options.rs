/// Configuration options for a [`Lexer`](crate::Lexer).
///
/// # Examples
///
/// ```rust
/// use jsonrt::{Lexer, LexerOptions};
///
/// let options = LexerOptions {
///     disallow_unknown_fields: true,
/// };
/// let lexer = Lexer::with_options(br#"{"a":1}"#, options);
/// assert!(lexer.options().disallow_unknown_fields);
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Whether object keys that the target type does not know are an error.
    ///
    /// When `false`, unknown keys are skipped, or captured verbatim by an
    /// [`UnknownFields`](crate::UnknownFields) proxy when the target type
    /// embeds one. When `true`, the first unknown key records an
    /// [`ErrorKind::UnknownField`](crate::ErrorKind::UnknownField) error and
    /// nothing is captured.
    ///
    /// # Default
    ///
    /// `false`
    pub disallow_unknown_fields: bool,
}
