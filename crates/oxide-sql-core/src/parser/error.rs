//! Parser error types.

use serde::Serialize;

use crate::lexer::{Token, TokenKind};

/// Position of an error in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// Byte offset.
    pub offset: usize,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl Location {
    /// Location of the first character of `token`.
    #[must_use]
    pub const fn of(token: &Token) -> Self {
        Self {
            offset: token.span.start,
            line: token.line,
            column: token.column,
        }
    }
}

/// The offending token of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TokenInfo {
    /// Token class name, e.g. `IDENTIFIER` or `RPAREN`.
    pub kind: String,
    /// Source text of the token.
    pub text: String,
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind.name().to_string(),
            text: token.text(),
        }
    }
}

/// Errors raised while lexing or parsing SQL.
///
/// Parsing is all-or-nothing: the first error aborts the statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    /// Malformed token: unterminated literal or illegal character.
    #[error("{message}, pos {}, line {}, column {}", location.offset, location.line, location.column)]
    Lexical {
        /// What went wrong.
        message: String,
        /// Where the bad token starts.
        location: Location,
    },

    /// An expected token or production was not found.
    #[error(
        "{message}, pos {}, line {}, column {}, token {} {}",
        location.offset, location.line, location.column, token.kind, token.text
    )]
    Syntax {
        /// What went wrong.
        message: String,
        /// The offending token.
        token: TokenInfo,
        /// Where the offending token starts.
        location: Location,
    },

    /// The active dialect rejects a construct.
    #[error(
        "not supported. {message}, pos {}, line {}, column {}, token {} {}",
        location.offset, location.line, location.column, token.kind, token.text
    )]
    Unsupported {
        /// What is not supported.
        message: String,
        /// The token where the construct starts.
        token: TokenInfo,
        /// Where that token starts.
        location: Location,
    },
}

impl SqlError {
    /// Creates a syntax error at `token`.
    #[must_use]
    pub fn syntax(message: impl Into<String>, token: &Token) -> Self {
        if let TokenKind::Error(lexical) = &token.kind {
            return Self::lexical(lexical.clone(), token);
        }
        Self::Syntax {
            message: message.into(),
            token: TokenInfo::from(token),
            location: Location::of(token),
        }
    }

    /// Creates an "expected X, got Y" error.
    #[must_use]
    pub fn unexpected(expected: &str, token: &Token) -> Self {
        Self::syntax(
            format!("syntax error, expect {expected}, actual {}", token.kind.name()),
            token,
        )
    }

    /// Creates a lexical error at `token`.
    #[must_use]
    pub fn lexical(message: impl Into<String>, token: &Token) -> Self {
        Self::Lexical {
            message: message.into(),
            location: Location::of(token),
        }
    }

    /// Creates an unsupported-construct error at `token`.
    #[must_use]
    pub fn unsupported(message: impl Into<String>, token: &Token) -> Self {
        Self::Unsupported {
            message: message.into(),
            token: TokenInfo::from(token),
            location: Location::of(token),
        }
    }

    /// Returns the message without position information.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Lexical { message, .. }
            | Self::Syntax { message, .. }
            | Self::Unsupported { message, .. } => message,
        }
    }

    /// Returns the error location.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Lexical { location, .. }
            | Self::Syntax { location, .. }
            | Self::Unsupported { location, .. } => *location,
        }
    }

    /// Returns the 1-based line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.location().line
    }

    /// Returns the 1-based column.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.location().column
    }

    /// Returns the byte offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.location().offset
    }

    /// Returns the offending token, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&TokenInfo> {
        match self {
            Self::Lexical { .. } => None,
            Self::Syntax { token, .. } | Self::Unsupported { token, .. } => Some(token),
        }
    }
}

/// Result type for parsing.
pub type Result<T> = std::result::Result<T, SqlError>;
