//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for SQL that produces a stream of tokens.
//! Lexical differences between dialects are captured by [`LexerConfig`].

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{Lexer, Mark};

/// Per-dialect lexical rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LexerConfig {
    /// Decode backslash escapes inside quoted strings.
    pub backslash_escapes: bool,
    /// `"..."` is a string literal rather than a quoted identifier.
    pub double_quoted_strings: bool,
    /// `` `...` `` is a quoted identifier.
    pub backtick_identifiers: bool,
    /// `[...]` is a quoted identifier.
    pub bracket_identifiers: bool,
    /// `$tag$...$tag$` strings.
    pub dollar_quoted_strings: bool,
    /// `#` starts a line comment.
    pub hash_comments: bool,
    /// `E'...'` strings with backslash escapes.
    pub escape_strings: bool,
    /// `??`, `?|`, `??|` and `?&` are operators instead of placeholders.
    pub json_operators: bool,
}

impl LexerConfig {
    /// Standard SQL: single-quoted strings, double-quoted identifiers.
    pub const ANSI: Self = Self {
        backslash_escapes: false,
        double_quoted_strings: false,
        backtick_identifiers: false,
        bracket_identifiers: false,
        dollar_quoted_strings: false,
        hash_comments: false,
        escape_strings: false,
        json_operators: false,
    };
}
