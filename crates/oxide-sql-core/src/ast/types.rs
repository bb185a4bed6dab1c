//! Static types of expressions.

use serde::Serialize;

use super::arena::Ast;
use super::node::{IntegerWidth, NodeId, NodeKind, TypedLiteralKind};
use super::ops::UnaryOp;
use crate::hash::{fnv1a_64_lower, names};

/// The type of an expression when it can be known without a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StaticType {
    Null,
    Boolean,
    Int,
    BigInt,
    /// Integer wider than 64 bits.
    HugeInt,
    Decimal,
    Double,
    Varchar,
    NVarchar,
    Binary,
    Date,
    Time,
    Timestamp,
    Interval,
}

impl StaticType {
    /// Returns the SQL type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "BOOLEAN",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::HugeInt => "DECIMAL(38)",
            Self::Decimal => "DECIMAL",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::Binary => "BINARY",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Interval => "INTERVAL",
        }
    }

    /// Maps a type name, as written in `CAST(x AS name)`, to a static type.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        const INT: u64 = fnv1a_64_lower("int");
        const INTEGER: u64 = fnv1a_64_lower("integer");
        const SMALLINT: u64 = fnv1a_64_lower("smallint");
        const TINYINT: u64 = fnv1a_64_lower("tinyint");
        const BIGINT: u64 = fnv1a_64_lower("bigint");
        const INT8: u64 = fnv1a_64_lower("int8");
        const NUMERIC: u64 = fnv1a_64_lower("numeric");
        const FLOAT: u64 = fnv1a_64_lower("float");
        const REAL: u64 = fnv1a_64_lower("real");
        const TEXT: u64 = fnv1a_64_lower("text");
        const STRING: u64 = fnv1a_64_lower("string");
        const NVARCHAR: u64 = fnv1a_64_lower("nvarchar");
        const BOOL: u64 = fnv1a_64_lower("bool");
        const VARBINARY: u64 = fnv1a_64_lower("varbinary");
        const BLOB: u64 = fnv1a_64_lower("blob");

        let head = name.split_whitespace().next().unwrap_or(name);
        Some(match fnv1a_64_lower(head) {
            INT | INTEGER | SMALLINT | TINYINT | names::INT4 => Self::Int,
            BIGINT | INT8 => Self::BigInt,
            names::DECIMAL | NUMERIC => Self::Decimal,
            names::DOUBLE | FLOAT | REAL => Self::Double,
            names::VARCHAR | names::CHAR | names::CHARACTER | TEXT | STRING => Self::Varchar,
            NVARCHAR => Self::NVarchar,
            names::BOOLEAN | BOOL => Self::Boolean,
            names::BINARY | VARBINARY | BLOB => Self::Binary,
            names::DATE => Self::Date,
            names::TIME => Self::Time,
            names::TIMESTAMP | names::DATETIME | names::TIMESTAMPTZ => Self::Timestamp,
            _ => return None,
        })
    }

    const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int | Self::BigInt | Self::HugeInt | Self::Decimal | Self::Double
        )
    }

    pub(crate) fn compute(ast: &Ast, id: NodeId) -> Option<Self> {
        match ast.kind(id) {
            NodeKind::Integer(v) => Some(match IntegerWidth::of(*v) {
                IntegerWidth::Int => Self::Int,
                IntegerWidth::Long => Self::BigInt,
                IntegerWidth::Big => Self::HugeInt,
            }),
            NodeKind::Number(_) => Some(Self::Double),
            NodeKind::Decimal(_) => Some(Self::Decimal),
            NodeKind::Char(_) | NodeKind::Introducer { .. } => Some(Self::Varchar),
            NodeKind::NChar(_) => Some(Self::NVarchar),
            NodeKind::Hex(_) | NodeKind::Bits(_) => Some(Self::Binary),
            NodeKind::Null => Some(Self::Null),
            NodeKind::TypedLiteral { kind, .. } => Some(match kind {
                TypedLiteralKind::Date => Self::Date,
                TypedLiteralKind::Time => Self::Time,
                TypedLiteralKind::Timestamp | TypedLiteralKind::DateTime => Self::Timestamp,
            }),
            NodeKind::Interval { .. } => Some(Self::Interval),
            NodeKind::Boolean(_)
            | NodeKind::Not { .. }
            | NodeKind::Between { .. }
            | NodeKind::InList { .. }
            | NodeKind::InSubquery { .. }
            | NodeKind::Exists { .. }
            | NodeKind::MatchAgainst { .. } => Some(Self::Boolean),
            NodeKind::BinaryGroup { op, .. } if op.is_logical() => Some(Self::Boolean),
            NodeKind::Binary { op, left, right } => {
                if op.is_relational() || op.is_logical() {
                    Some(Self::Boolean)
                } else if op.is_arithmetic() {
                    let (l, r) = (ast.data_type_of(*left)?, ast.data_type_of(*right)?);
                    (l.is_numeric() && r.is_numeric()).then(|| l.max(r))
                } else {
                    None
                }
            }
            NodeKind::Unary { op, operand } => match op {
                UnaryOp::Negative | UnaryOp::Plus => ast.data_type_of(*operand),
                UnaryOp::Not | UnaryOp::NotNot => Some(Self::Boolean),
                UnaryOp::Compl | UnaryOp::Binary => None,
            },
            NodeKind::Cast { data_type, .. } => match ast.kind(*data_type) {
                NodeKind::DataType { name, .. } => Self::from_type_name(name),
                _ => None,
            },
            NodeKind::Aggregate { name, .. } if fnv1a_64_lower(name) == COUNT => Some(Self::BigInt),
            NodeKind::Collate { expr, .. } => ast.data_type_of(*expr),
            _ => None,
        }
    }
}

const COUNT: u64 = fnv1a_64_lower("count");
