//! Operator kinds.

use serde::Serialize;

/// Binary operators.
///
/// Each operator belongs to exactly one level of the expression grammar;
/// [`BinaryOp::precedence`] mirrors that level so the printer can decide
/// where parentheses are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    // Multiplicative / additive
    Multiply,
    Divide,
    /// MySQL integer division `DIV`.
    Div,
    /// `%` and `MOD`.
    Modulus,
    Add,
    Subtract,
    Concat,

    // Bitwise xor level, including JSON and geometric operators
    BitwiseXor,
    BitwiseXorEq,
    /// `->`
    SubGt,
    /// `->>`
    SubGtGt,
    /// `#>`
    PoundGt,
    /// `#>>`
    PoundGtGt,
    /// `<->`
    LtDashGt,
    /// `??`
    QuesQues,
    /// `?|`
    QuesBar,
    /// `??|`
    QuesQuesBar,
    /// `?&`
    QuesAmp,

    // Shift and bitwise
    LeftShift,
    RightShift,
    RightShiftUnsigned,
    BitwiseAnd,
    BitwiseOr,

    // Comparison
    Equality,
    /// `==`
    EqEq,
    NotEqual,
    LessThanOrGreater,
    LessThan,
    LessThanOrEqual,
    /// `<=>`
    LessThanOrEqualOrGreaterThan,
    GreaterThan,
    GreaterThanOrEqual,
    /// `!<`
    NotLessThan,
    /// `!>`
    NotGreaterThan,
    /// `:=`
    Assignment,
    Is,
    IsNot,
    IsDistinctFrom,
    IsNotDistinctFrom,

    // Pattern matching
    Like,
    NotLike,
    ILike,
    NotILike,
    RLike,
    NotRLike,
    RegExp,
    NotRegExp,
    SoundsLike,
    SimilarTo,
    NotSimilarTo,
    Glob,
    NotGlob,
    Match,
    NotMatch,
    /// `x LIKE y ESCAPE z`; the left operand is the `LIKE`.
    Escape,
    /// `~`
    RegexMatch,
    /// `~*`
    RegexMatchInsensitive,
    /// `!~`
    RegexNotMatch,
    /// `!~*`
    RegexNotMatchInsensitive,
    /// `~=`
    SameAs,
    /// `@>`
    ArrayContains,
    /// `<@`
    ArrayContainedBy,
    /// `@@`
    AtAt,
    /// `?`
    JsonContains,

    // Logical
    BooleanAnd,
    /// `&&` where it is not a plain `AND`.
    PgAnd,
    BooleanXor,
    BooleanOr,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Div => "DIV",
            Self::Modulus => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Concat => "||",
            Self::BitwiseXor => "^",
            Self::BitwiseXorEq => "^ =",
            Self::SubGt => "->",
            Self::SubGtGt => "->>",
            Self::PoundGt => "#>",
            Self::PoundGtGt => "#>>",
            Self::LtDashGt => "<->",
            Self::QuesQues => "??",
            Self::QuesBar => "?|",
            Self::QuesQuesBar => "??|",
            Self::QuesAmp => "?&",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::RightShiftUnsigned => ">>>",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::Equality => "=",
            Self::EqEq => "==",
            Self::NotEqual => "!=",
            Self::LessThanOrGreater => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::LessThanOrEqualOrGreaterThan => "<=>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::NotLessThan => "!<",
            Self::NotGreaterThan => "!>",
            Self::Assignment => ":=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::IsDistinctFrom => "IS DISTINCT FROM",
            Self::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::ILike => "ILIKE",
            Self::NotILike => "NOT ILIKE",
            Self::RLike => "RLIKE",
            Self::NotRLike => "NOT RLIKE",
            Self::RegExp => "REGEXP",
            Self::NotRegExp => "NOT REGEXP",
            Self::SoundsLike => "SOUNDS LIKE",
            Self::SimilarTo => "SIMILAR TO",
            Self::NotSimilarTo => "NOT SIMILAR TO",
            Self::Glob => "GLOB",
            Self::NotGlob => "NOT GLOB",
            Self::Match => "MATCH",
            Self::NotMatch => "NOT MATCH",
            Self::Escape => "ESCAPE",
            Self::RegexMatch => "~",
            Self::RegexMatchInsensitive => "~*",
            Self::RegexNotMatch => "!~",
            Self::RegexNotMatchInsensitive => "!~*",
            Self::SameAs => "~=",
            Self::ArrayContains => "@>",
            Self::ArrayContainedBy => "<@",
            Self::AtAt => "@@",
            Self::JsonContains => "?",
            Self::BooleanAnd => "AND",
            Self::PgAnd => "&&",
            Self::BooleanXor => "XOR",
            Self::BooleanOr => "OR",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::BooleanOr => 10,
            Self::BooleanXor => 20,
            Self::BooleanAnd | Self::PgAnd => 30,
            Self::BitwiseOr => 50,
            Self::BitwiseAnd => 60,
            Self::LeftShift | Self::RightShift | Self::RightShiftUnsigned => 70,
            Self::Add | Self::Subtract | Self::Concat => 80,
            Self::Multiply | Self::Divide | Self::Div | Self::Modulus => 90,
            Self::BitwiseXor
            | Self::BitwiseXorEq
            | Self::SubGt
            | Self::SubGtGt
            | Self::PoundGt
            | Self::PoundGtGt
            | Self::LtDashGt
            | Self::QuesQues
            | Self::QuesBar
            | Self::QuesQuesBar
            | Self::QuesAmp => 100,
            _ => RELATIONAL,
        }
    }

    /// Returns true for comparison and pattern operators.
    #[must_use]
    pub const fn is_relational(&self) -> bool {
        self.precedence() == RELATIONAL
    }

    /// Returns true for `AND`, `&&`, `XOR` and `OR`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(
            self,
            Self::BooleanAnd | Self::PgAnd | Self::BooleanXor | Self::BooleanOr
        )
    }

    /// Returns true for arithmetic operators.
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Multiply
                | Self::Divide
                | Self::Div
                | Self::Modulus
                | Self::Add
                | Self::Subtract
        )
    }

    /// Returns the negated form of a pattern operator, if it has one.
    #[must_use]
    pub const fn negated(&self) -> Option<Self> {
        Some(match self {
            Self::Like => Self::NotLike,
            Self::ILike => Self::NotILike,
            Self::RLike => Self::NotRLike,
            Self::RegExp => Self::NotRegExp,
            Self::SimilarTo => Self::NotSimilarTo,
            Self::Glob => Self::NotGlob,
            Self::Match => Self::NotMatch,
            Self::Is => Self::IsNot,
            Self::IsDistinctFrom => Self::IsNotDistinctFrom,
            _ => return None,
        })
    }
}

/// Precedence shared by every comparison, `IS`, `LIKE`, `BETWEEN` and `IN`.
pub const RELATIONAL: u8 = 40;

/// Precedence of the `NOT` prefix.
pub const NOT: u8 = 35;

/// Precedence of prefix operators.
pub const UNARY: u8 = 110;

/// Precedence of primaries.
pub const PRIMARY: u8 = 200;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    /// Negation (-)
    Negative,
    /// Unary plus (+)
    Plus,
    /// Bitwise complement (~)
    Compl,
    /// `!`
    Not,
    /// `!!`
    NotNot,
    /// MySQL `BINARY x`.
    Binary,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "-",
            Self::Plus => "+",
            Self::Compl => "~",
            Self::Not => "!",
            Self::NotNot => "!!",
            Self::Binary => "BINARY ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_precedence() {
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::LeftShift.precedence());
        assert!(BinaryOp::LeftShift.precedence() > BinaryOp::BitwiseAnd.precedence());
        assert!(BinaryOp::BitwiseAnd.precedence() > BinaryOp::BitwiseOr.precedence());
        assert!(BinaryOp::BitwiseOr.precedence() > BinaryOp::Equality.precedence());
        assert!(BinaryOp::Equality.precedence() > BinaryOp::BooleanAnd.precedence());
        assert!(BinaryOp::BooleanAnd.precedence() > BinaryOp::BooleanXor.precedence());
        assert!(BinaryOp::BooleanXor.precedence() > BinaryOp::BooleanOr.precedence());
        assert!(BinaryOp::BitwiseXor.precedence() > BinaryOp::Multiply.precedence());
    }

    #[test]
    fn test_classification() {
        assert!(BinaryOp::Like.is_relational());
        assert!(BinaryOp::Escape.is_relational());
        assert!(!BinaryOp::Concat.is_relational());
        assert!(BinaryOp::PgAnd.is_logical());
        assert!(BinaryOp::Div.is_arithmetic());
        assert_eq!(BinaryOp::Like.negated(), Some(BinaryOp::NotLike));
        assert_eq!(BinaryOp::Add.negated(), None);
    }
}
