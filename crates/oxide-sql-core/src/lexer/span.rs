//! Byte ranges into the parsed input.

use serde::Serialize;

/// Half-open byte range `start..end` of a token or node in the input.
///
/// Nodes created outside a parse (by [`Ast::alloc`](crate::ast::Ast::alloc)
/// or `deep_clone` of a synthesised node) carry the empty span at offset 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the source text covered by the span, or `None` when the
    /// span does not fall on character boundaries of `input`.
    #[must_use]
    pub fn slice(self, input: &str) -> Option<&str> {
        input.get(self.start..self.end)
    }
}
