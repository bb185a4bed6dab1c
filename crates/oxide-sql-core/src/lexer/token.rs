//! Token types for the SQL lexer.

use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use super::Span;
use crate::hash::fnv1a_64_lower;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// Reserved SQL words.
        ///
        /// Bare words outside this set lex as identifiers, even when the
        /// grammar gives them meaning (`NATURAL`, `CROSS`, `DISTRIBUTE`);
        /// those are recognised through [`crate::hash::names`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Every keyword.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the SQL representation of the keyword.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    All => "ALL",
    Alter => "ALTER",
    And => "AND",
    Any => "ANY",
    As => "AS",
    Asc => "ASC",
    Between => "BETWEEN",
    By => "BY",
    Cascade => "CASCADE",
    Case => "CASE",
    Cast => "CAST",
    Check => "CHECK",
    Column => "COLUMN",
    Comment => "COMMENT",
    Constraint => "CONSTRAINT",
    Create => "CREATE",
    Cursor => "CURSOR",
    Database => "DATABASE",
    Declare => "DECLARE",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Distinct => "DISTINCT",
    Drop => "DROP",
    Else => "ELSE",
    End => "END",
    Escape => "ESCAPE",
    Except => "EXCEPT",
    Exists => "EXISTS",
    False => "FALSE",
    Fetch => "FETCH",
    For => "FOR",
    Foreign => "FOREIGN",
    From => "FROM",
    Full => "FULL",
    Grant => "GRANT",
    Group => "GROUP",
    Having => "HAVING",
    If => "IF",
    ILike => "ILIKE",
    In => "IN",
    Index => "INDEX",
    Inner => "INNER",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Join => "JOIN",
    Key => "KEY",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Lock => "LOCK",
    Loop => "LOOP",
    Minus => "MINUS",
    Not => "NOT",
    Null => "NULL",
    Offset => "OFFSET",
    On => "ON",
    Or => "OR",
    Order => "ORDER",
    Outer => "OUTER",
    Over => "OVER",
    Partition => "PARTITION",
    Primary => "PRIMARY",
    Procedure => "PROCEDURE",
    References => "REFERENCES",
    Replace => "REPLACE",
    Revoke => "REVOKE",
    Right => "RIGHT",
    RLike => "RLIKE",
    Row => "ROW",
    Schema => "SCHEMA",
    Select => "SELECT",
    Set => "SET",
    Some => "SOME",
    Table => "TABLE",
    Then => "THEN",
    To => "TO",
    Top => "TOP",
    Trigger => "TRIGGER",
    True => "TRUE",
    Truncate => "TRUNCATE",
    Union => "UNION",
    Unique => "UNIQUE",
    Update => "UPDATE",
    User => "USER",
    Using => "USING",
    Values => "VALUES",
    View => "VIEW",
    When => "WHEN",
    Where => "WHERE",
    Window => "WINDOW",
    With => "WITH",
    Xor => "XOR",
}

/// Keyword hashes sorted for binary search.
static KEYWORD_TABLE: LazyLock<Vec<(u64, Keyword)>> = LazyLock::new(|| {
    let mut table: Vec<(u64, Keyword)> = Keyword::ALL
        .iter()
        .map(|kw| (fnv1a_64_lower(kw.as_str()), *kw))
        .collect();
    table.sort_unstable_by_key(|(hash, _)| *hash);
    table
});

impl Keyword {
    /// Looks up a keyword by its pre-computed lower-case hash.
    #[must_use]
    pub fn from_hash(hash: u64) -> Option<Self> {
        KEYWORD_TABLE
            .binary_search_by_key(&hash, |(h, _)| *h)
            .ok()
            .map(|i| KEYWORD_TABLE[i].1)
    }

    /// Parses a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::from_hash(fnv1a_64_lower(s)).filter(|kw| kw.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns the lower-case hash of the keyword.
    #[must_use]
    pub const fn hash_code_64(&self) -> u64 {
        fnv1a_64_lower(self.as_str())
    }
}

/// Token types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Integer literal, wide enough to negate any 64-bit value exactly.
    Integer(i128),
    /// Floating-point literal, kept as source text.
    Float(String),
    /// Decimal literal (`1.5BD`), kept as source text without the suffix.
    Decimal(String),
    /// String literal, unescaped.
    String(String),
    /// National string literal (`N'...'`), unescaped.
    NString(String),
    /// Hex literal digits (`X'..'` or `0x..`).
    Hex(String),
    /// Bit string digits (`B'..'`).
    Bits(String),
    /// Variable or named parameter (`:name`, `@var`, `@@var`, `$1`).
    Variable(String),

    // Identifiers and keywords
    /// Identifier, with its quotes if it was quoted.
    Identifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// ==
    EqEq,
    /// !=
    NotEq,
    /// <>
    LtGt,
    /// <
    Lt,
    /// <=
    LtEq,
    /// <=>
    LtEqGt,
    /// >
    Gt,
    /// >=
    GtEq,
    /// !<
    NotLt,
    /// !>
    NotGt,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// &&
    AmpAmp,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// ~*
    TildeStar,
    /// ~=
    TildeEq,
    /// ^
    Caret,
    /// ^=
    CaretEq,
    /// !
    Bang,
    /// !!
    BangBang,
    /// !~
    BangTilde,
    /// !~*
    BangTildeStar,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// >>>
    UnsignedRightShift,
    /// ->
    Arrow,
    /// ->>
    DoubleArrow,
    /// #
    Pound,
    /// #>
    PoundGt,
    /// #>>
    PoundGtGt,
    /// <->
    LtDashGt,
    /// ??
    QuesQues,
    /// ?|
    QuesBar,
    /// ??|
    QuesQuesBar,
    /// ?&
    QuesAmp,
    /// @@
    AtAt,
    /// @>
    AtGt,
    /// <@
    LtAt,
    /// :=
    ColonEq,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// ?
    Question,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl TokenKind {
    /// Returns the upper-case token class name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "LITERAL_INT",
            Self::Float(_) | Self::Decimal(_) => "LITERAL_FLOAT",
            Self::String(_) => "LITERAL_CHARS",
            Self::NString(_) => "LITERAL_NCHARS",
            Self::Hex(_) => "LITERAL_HEX",
            Self::Bits(_) => "BITS",
            Self::Variable(_) => "VARIANT",
            Self::Identifier(_) => "IDENTIFIER",
            Self::Keyword(kw) => kw.as_str(),
            Self::Plus => "PLUS",
            Self::Minus => "SUB",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::Percent => "PERCENT",
            Self::Eq => "EQ",
            Self::EqEq => "EQEQ",
            Self::NotEq => "BANGEQ",
            Self::LtGt => "LTGT",
            Self::Lt => "LT",
            Self::LtEq => "LTEQ",
            Self::LtEqGt => "LTEQGT",
            Self::Gt => "GT",
            Self::GtEq => "GTEQ",
            Self::NotLt => "BANGLT",
            Self::NotGt => "BANGGT",
            Self::Concat => "BARBAR",
            Self::BitAnd => "AMP",
            Self::AmpAmp => "AMPAMP",
            Self::BitOr => "BAR",
            Self::BitNot => "TILDE",
            Self::TildeStar => "TILDE_STAR",
            Self::TildeEq => "TILDE_EQ",
            Self::Caret => "CARET",
            Self::CaretEq => "CARETEQ",
            Self::Bang => "BANG",
            Self::BangBang => "BANGBANG",
            Self::BangTilde => "BANG_TILDE",
            Self::BangTildeStar => "BANG_TILDE_STAR",
            Self::LeftShift => "LTLT",
            Self::RightShift => "GTGT",
            Self::UnsignedRightShift => "GTGTGT",
            Self::Arrow => "SUBGT",
            Self::DoubleArrow => "SUBGTGT",
            Self::Pound => "POUND",
            Self::PoundGt => "POUNDGT",
            Self::PoundGtGt => "POUNDGTGT",
            Self::LtDashGt => "LT_SUB_GT",
            Self::QuesQues => "QUESQUES",
            Self::QuesBar => "QUESBAR",
            Self::QuesQuesBar => "QUESQUESBAR",
            Self::QuesAmp => "QUESAMP",
            Self::AtAt => "MONKEYS_AT_AT",
            Self::AtGt => "MONKEYS_AT_GT",
            Self::LtAt => "LT_MONKEYS_AT",
            Self::ColonEq => "COLONEQ",
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::LeftBracket => "LBRACKET",
            Self::RightBracket => "RBRACKET",
            Self::LeftBrace => "LBRACE",
            Self::RightBrace => "RBRACE",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMI",
            Self::Dot => "DOT",
            Self::Colon => "COLON",
            Self::DoubleColon => "COLONCOLON",
            Self::Question => "QUES",
            Self::Eof => "EOF",
            Self::Error(_) => "ERROR",
        }
    }

    /// Returns the fixed source text of punctuation and operator tokens.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::LtGt => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::LtEqGt => "<=>",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::NotLt => "!<",
            Self::NotGt => "!>",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::AmpAmp => "&&",
            Self::BitOr => "|",
            Self::BitNot => "~",
            Self::TildeStar => "~*",
            Self::TildeEq => "~=",
            Self::Caret => "^",
            Self::CaretEq => "^=",
            Self::Bang => "!",
            Self::BangBang => "!!",
            Self::BangTilde => "!~",
            Self::BangTildeStar => "!~*",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::UnsignedRightShift => ">>>",
            Self::Arrow => "->",
            Self::DoubleArrow => "->>",
            Self::Pound => "#",
            Self::PoundGt => "#>",
            Self::PoundGtGt => "#>>",
            Self::LtDashGt => "<->",
            Self::QuesQues => "??",
            Self::QuesBar => "?|",
            Self::QuesQuesBar => "??|",
            Self::QuesAmp => "?&",
            Self::AtAt => "@@",
            Self::AtGt => "@>",
            Self::LtAt => "<@",
            Self::ColonEq => ":=",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::DoubleColon => "::",
            Self::Question => "?",
            _ => return None,
        })
    }

    /// Returns true if this is an identifier or keyword, i.e. a bare word.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(self, Self::Identifier(_) | Self::Keyword(_))
    }
}

/// Renders the token the way it would appear in source.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(text) => f.write_str(text),
            Self::Decimal(text) => write!(f, "{text}BD"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::NString(s) => write!(f, "N'{}'", s.replace('\'', "''")),
            Self::Hex(h) => write!(f, "X'{h}'"),
            Self::Bits(b) => write!(f, "B'{b}'"),
            Self::Variable(name) | Self::Identifier(name) => f.write_str(name),
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Eof => f.write_str("EOF"),
            Self::Error(message) => f.write_str(message),
            other => f.write_str(other.symbol().unwrap_or_default()),
        }
    }
}

/// A token with its location in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column (in characters) of the first character.
    pub column: u32,
}

impl Token {
    /// Creates a new token on line 1.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        let column = u32::try_from(span.start).map_or(u32::MAX, |c| c.saturating_add(1));
        Self::at(kind, span, 1, column)
    }

    /// Creates a new token with an explicit line and column.
    #[must_use]
    pub const fn at(kind: TokenKind, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            span,
            line,
            column,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the source text of the token.
    #[must_use]
    pub fn text(&self) -> String {
        self.kind.to_string()
    }
}
