//! Node kinds of the arena AST.
//!
//! Children are referenced by [`NodeId`]. Every child reference lives in
//! one of three slot shapes: a required slot (`NodeId`), an optional slot
//! (`Option<NodeId>`) or a list slot (`Vec<NodeId>`). [`NodeKind::slots`]
//! enumerates them in a fixed order, which is also the order in which the
//! visitor descends and the printer emits them.

use std::fmt;

use serde::Serialize;

use super::ops::{self, BinaryOp, UnaryOp};

/// Handle of a node inside an [`Ast`](super::Ast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Placeholder used when comparing node attributes without children.
    pub(crate) const PLACEHOLDER: Self = Self(u32::MAX);

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `DATE '..'` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypedLiteralKind {
    Date,
    Time,
    Timestamp,
    DateTime,
}

impl TypedLiteralKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::DateTime => "DATETIME",
        }
    }
}

/// `ANY`, `SOME` or `ALL` before a subquery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quantifier {
    Any,
    Some,
    All,
}

impl Quantifier {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Some => "SOME",
            Self::All => "ALL",
        }
    }
}

/// `NEXTVAL`, `CURRVAL` or `PREVVAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SequenceFunction {
    NextVal,
    CurrVal,
    PrevVal,
}

impl SequenceFunction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NextVal => "NEXTVAL",
            Self::CurrVal => "CURRVAL",
            Self::PrevVal => "PREVVAL",
        }
    }
}

/// `TRIM(LEADING|TRAILING|BOTH ..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrimOption {
    Leading,
    Trailing,
    Both,
}

impl TrimOption {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leading => "LEADING",
            Self::Trailing => "TRAILING",
            Self::Both => "BOTH",
        }
    }
}

/// `DISTINCT` or `ALL` in an aggregate call or select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetQuantifier {
    Distinct,
    All,
}

impl SetQuantifier {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
        }
    }
}

/// `IGNORE NULLS` / `RESPECT NULLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NullTreatment {
    Ignore,
    Respect,
}

impl NullTreatment {
    /// Returns the SQL text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE NULLS",
            Self::Respect => "RESPECT NULLS",
        }
    }
}

/// `ROWS` or `RANGE` window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FrameUnit {
    Rows,
    Range,
}

impl FrameUnit {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
        }
    }
}

/// One end of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoundKind {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding,
    Following,
}

/// Set operator between two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetOperator {
    Union,
    UnionAll,
    UnionDistinct,
    Except,
    Intersect,
    Minus,
}

impl SetOperator {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::UnionDistinct => "UNION DISTINCT",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
            Self::Minus => "MINUS",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// `NULLS FIRST` / `NULLS LAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NullsOrder {
    First,
    Last,
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JoinType {
    /// `,`
    Comma,
    /// `JOIN` / `INNER JOIN`
    Inner,
    /// `LEFT [OUTER] JOIN`
    Left,
    /// `RIGHT [OUTER] JOIN`
    Right,
    /// `FULL [OUTER] JOIN`
    Full,
    /// `CROSS JOIN`
    Cross,
}

impl JoinType {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Literals
    /// Integer literal; see [`IntegerWidth`].
    Integer(i128),
    /// Approximate numeric literal, kept as source text.
    Number(String),
    /// Exact decimal literal (`1.5BD`, `DECIMAL '1.5'`).
    Decimal(String),
    /// Character string literal.
    Char(String),
    /// National character string literal.
    NChar(String),
    /// String with a character set introducer: `_utf8mb4 'abc'`.
    Introducer { charset: String, value: String },
    /// Hex literal digits.
    Hex(String),
    /// Bit string digits.
    Bits(String),
    Boolean(bool),
    Null,
    /// `DEFAULT` used as a value.
    Default,
    /// `DATE '2020-01-01'`, `TIMESTAMP '..'`.
    TypedLiteral { kind: TypedLiteralKind, value: String },
    /// Placeholder or variable: `?`, `:name`, `@v`, `$1`.
    Variant { name: String, index: Option<u32> },
    /// Bare `CURRENT_USER`.
    CurrentUser,

    // Names
    /// A bare or quoted name, as written.
    Identifier(String),
    /// `owner.name`
    Property { owner: NodeId, name: String },
    /// `*` or `owner.*`, with optional `EXCEPT(..)` and `REPLACE(..)`.
    AllColumn {
        owner: Option<NodeId>,
        except: Vec<NodeId>,
        replace: Vec<NodeId>,
    },

    // Operators
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    /// Flattened `a AND b AND c` chain.
    BinaryGroup { op: BinaryOp, items: Vec<NodeId> },
    Unary { op: UnaryOp, operand: NodeId },
    /// `NOT expr`
    Not { operand: NodeId },
    Between {
        expr: NodeId,
        low: NodeId,
        high: NodeId,
        not: bool,
    },
    InList {
        expr: NodeId,
        items: Vec<NodeId>,
        not: bool,
        global: bool,
    },
    InSubquery {
        expr: NodeId,
        query: NodeId,
        not: bool,
        global: bool,
    },
    Exists { query: NodeId, not: bool },
    /// `ANY (SELECT ..)`
    Quantified { quantifier: Quantifier, query: NodeId },

    // Compound expressions
    Case {
        value: Option<NodeId>,
        whens: Vec<NodeId>,
        else_result: Option<NodeId>,
    },
    CaseWhen { condition: NodeId, result: NodeId },
    /// `CAST(x AS t)`, `TRY_CAST(..)` or `x::t`.
    Cast {
        expr: NodeId,
        data_type: NodeId,
        try_cast: bool,
        postfix: bool,
    },
    Interval { value: NodeId, unit: Option<String> },
    Collate { expr: NodeId, collation: String },
    /// Parenthesised row: `(a, b)`.
    List { items: Vec<NodeId> },
    /// `[a, b]` or `ARRAY[a, b]`.
    ArrayLiteral {
        items: Vec<NodeId>,
        prefixed: bool,
        element_type: Option<NodeId>,
    },
    /// `expr[index]`
    Index { expr: NodeId, index: NodeId },
    /// A query used as an expression.
    Subquery { query: NodeId },
    /// `seq.NEXTVAL`
    Sequence { name: NodeId, function: SequenceFunction },
    /// `CURRENT OF cursor`
    CurrentOf { cursor: String },
    /// `GROUPING SETS (..)`
    GroupingSets { items: Vec<NodeId> },
    /// MySQL `MATCH (cols) AGAINST (expr [modifier])`.
    MatchAgainst {
        columns: Vec<NodeId>,
        against: NodeId,
        modifier: Option<String>,
    },
    /// Function call.
    MethodInvoke {
        owner: Option<NodeId>,
        name: String,
        args: Vec<NodeId>,
        /// Second argument list of a curried call `f(a)(b)`.
        curried: Option<Vec<NodeId>>,
        trim: Option<TrimOption>,
        from: Option<NodeId>,
        for_expr: Option<NodeId>,
        using: Option<NodeId>,
    },
    /// Aggregate or window function call.
    Aggregate {
        name: String,
        quantifier: Option<SetQuantifier>,
        args: Vec<NodeId>,
        /// Second argument list of a parametric call `quantile(0.5)(x)`.
        curried: Option<Vec<NodeId>>,
        order_by: Option<NodeId>,
        separator: Option<NodeId>,
        limit: Option<NodeId>,
        nulls: Option<NullTreatment>,
        within_group: Option<NodeId>,
        filter: Option<NodeId>,
        over: Option<NodeId>,
    },
    /// `OVER name` or `OVER (..)`.
    Over {
        name: Option<String>,
        partition_by: Vec<NodeId>,
        order_by: Option<NodeId>,
        frame: Option<NodeId>,
    },
    WindowFrame {
        unit: FrameUnit,
        start: NodeId,
        end: Option<NodeId>,
    },
    FrameBound { bound: BoundKind, offset: Option<NodeId> },
    DataType {
        name: String,
        args: Vec<NodeId>,
        /// `ARRAY<T>`, `MAP<K, V>`, `STRUCT<..>` parameters.
        type_args: Vec<NodeId>,
        /// Trailing words: `UNSIGNED`, `WITH TIME ZONE`, `[]`.
        modifiers: Vec<String>,
    },
    StructField { name: String, data_type: NodeId },

    // Statements
    SelectStatement { query: NodeId },
    Query {
        with: Option<NodeId>,
        body: NodeId,
        order_by: Option<NodeId>,
        limit: Option<NodeId>,
    },
    QueryBlock {
        quantifier: Option<SetQuantifier>,
        items: Vec<NodeId>,
        from: Option<NodeId>,
        where_clause: Option<NodeId>,
        group_by: Option<NodeId>,
        having: Option<NodeId>,
    },
    SelectItem { expr: NodeId, alias: Option<String> },
    SetOperation {
        op: SetOperator,
        left: NodeId,
        right: NodeId,
    },
    With { recursive: bool, entries: Vec<NodeId> },
    WithEntry {
        name: String,
        columns: Vec<String>,
        query: NodeId,
    },
    OrderBy { items: Vec<NodeId> },
    OrderItem {
        expr: NodeId,
        direction: Option<SortDirection>,
        nulls: Option<NullsOrder>,
    },
    GroupBy { items: Vec<NodeId>, rollup: bool },
    Limit { count: NodeId, offset: Option<NodeId> },

    // Table sources
    ExprTableSource { expr: NodeId, alias: Option<String> },
    JoinTableSource {
        left: NodeId,
        right: NodeId,
        join_type: JoinType,
        natural: bool,
        condition: Option<NodeId>,
        using: Vec<NodeId>,
    },
    SubqueryTableSource { query: NodeId, alias: Option<String> },
    /// Hive `LATERAL VIEW [OUTER] f(..) alias AS c1, c2`.
    LateralView {
        source: NodeId,
        function: NodeId,
        outer: bool,
        alias: Option<String>,
        columns: Vec<String>,
    },
}

/// Read-only view of one child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    One(&'a NodeId),
    Opt(&'a Option<NodeId>),
    Many(&'a Vec<NodeId>),
}

/// Mutable view of one child slot.
#[derive(Debug)]
pub enum SlotMut<'a> {
    One(&'a mut NodeId),
    Opt(&'a mut Option<NodeId>),
    Many(&'a mut Vec<NodeId>),
}

// Lists the slots of a kind in traversal order. Match ergonomics make the
// same arms produce shared or mutable references.
macro_rules! slots {
    ($kind:expr, $one:path, $opt:path, $many:path) => {
        match $kind {
            NodeKind::Integer(_)
            | NodeKind::Number(_)
            | NodeKind::Decimal(_)
            | NodeKind::Char(_)
            | NodeKind::NChar(_)
            | NodeKind::Introducer { .. }
            | NodeKind::Hex(_)
            | NodeKind::Bits(_)
            | NodeKind::Boolean(_)
            | NodeKind::Null
            | NodeKind::Default
            | NodeKind::TypedLiteral { .. }
            | NodeKind::Variant { .. }
            | NodeKind::CurrentUser
            | NodeKind::Identifier(_)
            | NodeKind::CurrentOf { .. } => vec![],
            NodeKind::Property { owner, .. } => vec![$one(owner)],
            NodeKind::AllColumn {
                owner,
                except,
                replace,
            } => vec![$opt(owner), $many(except), $many(replace)],
            NodeKind::Binary { left, right, .. } => vec![$one(left), $one(right)],
            NodeKind::BinaryGroup { items, .. }
            | NodeKind::List { items }
            | NodeKind::GroupingSets { items }
            | NodeKind::OrderBy { items }
            | NodeKind::GroupBy { items, .. } => vec![$many(items)],
            NodeKind::Unary { operand, .. } | NodeKind::Not { operand } => vec![$one(operand)],
            NodeKind::Between {
                expr, low, high, ..
            } => vec![$one(expr), $one(low), $one(high)],
            NodeKind::InList { expr, items, .. } => vec![$one(expr), $many(items)],
            NodeKind::InSubquery { expr, query, .. } => vec![$one(expr), $one(query)],
            NodeKind::Exists { query, .. }
            | NodeKind::Quantified { query, .. }
            | NodeKind::Subquery { query }
            | NodeKind::SelectStatement { query } => vec![$one(query)],
            NodeKind::Case {
                value,
                whens,
                else_result,
            } => vec![$opt(value), $many(whens), $opt(else_result)],
            NodeKind::CaseWhen { condition, result } => vec![$one(condition), $one(result)],
            NodeKind::Cast {
                expr, data_type, ..
            } => vec![$one(expr), $one(data_type)],
            NodeKind::Interval { value, .. } => vec![$one(value)],
            NodeKind::Collate { expr, .. } => vec![$one(expr)],
            NodeKind::ArrayLiteral {
                items,
                element_type,
                ..
            } => vec![$opt(element_type), $many(items)],
            NodeKind::Index { expr, index } => vec![$one(expr), $one(index)],
            NodeKind::Sequence { name, .. } => vec![$one(name)],
            NodeKind::MatchAgainst {
                columns, against, ..
            } => vec![$many(columns), $one(against)],
            NodeKind::MethodInvoke {
                owner,
                args,
                curried,
                from,
                for_expr,
                using,
                ..
            } => {
                let mut slots = vec![$opt(owner), $many(args)];
                if let Some(curried) = curried {
                    slots.push($many(curried));
                }
                slots.extend([$opt(from), $opt(for_expr), $opt(using)]);
                slots
            }
            NodeKind::Aggregate {
                args,
                curried,
                order_by,
                separator,
                limit,
                within_group,
                filter,
                over,
                ..
            } => {
                let mut slots = vec![$many(args)];
                if let Some(curried) = curried {
                    slots.push($many(curried));
                }
                slots.extend([
                    $opt(order_by),
                    $opt(separator),
                    $opt(limit),
                    $opt(within_group),
                    $opt(filter),
                    $opt(over),
                ]);
                slots
            }
            NodeKind::Over {
                partition_by,
                order_by,
                frame,
                ..
            } => vec![$many(partition_by), $opt(order_by), $opt(frame)],
            NodeKind::WindowFrame { start, end, .. } => vec![$one(start), $opt(end)],
            NodeKind::FrameBound { offset, .. } => vec![$opt(offset)],
            NodeKind::DataType {
                args, type_args, ..
            } => vec![$many(args), $many(type_args)],
            NodeKind::StructField { data_type, .. } => vec![$one(data_type)],
            NodeKind::Query {
                with,
                body,
                order_by,
                limit,
            } => vec![$opt(with), $one(body), $opt(order_by), $opt(limit)],
            NodeKind::QueryBlock {
                items,
                from,
                where_clause,
                group_by,
                having,
                ..
            } => vec![
                $many(items),
                $opt(from),
                $opt(where_clause),
                $opt(group_by),
                $opt(having),
            ],
            NodeKind::SelectItem { expr, .. } => vec![$one(expr)],
            NodeKind::SetOperation { left, right, .. } => vec![$one(left), $one(right)],
            NodeKind::With { entries, .. } => vec![$many(entries)],
            NodeKind::WithEntry { query, .. } => vec![$one(query)],
            NodeKind::OrderItem { expr, .. } => vec![$one(expr)],
            NodeKind::Limit { count, offset } => vec![$one(count), $opt(offset)],
            NodeKind::ExprTableSource { expr, .. } => vec![$one(expr)],
            NodeKind::JoinTableSource {
                left,
                right,
                condition,
                using,
                ..
            } => vec![$one(left), $one(right), $opt(condition), $many(using)],
            NodeKind::SubqueryTableSource { query, .. } => vec![$one(query)],
            NodeKind::LateralView {
                source, function, ..
            } => vec![$one(source), $one(function)],
        }
    };
}

impl NodeKind {
    /// Returns the child slots in traversal order.
    #[must_use]
    pub fn slots(&self) -> Vec<Slot<'_>> {
        slots!(self, Slot::One, Slot::Opt, Slot::Many)
    }

    /// Returns the child slots for in-place rewiring.
    pub fn slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        slots!(self, SlotMut::One, SlotMut::Opt, SlotMut::Many)
    }

    /// Returns the present children in traversal order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for slot in self.slots() {
            match slot {
                Slot::One(id) => out.push(*id),
                Slot::Opt(id) => out.extend(*id),
                Slot::Many(ids) => out.extend(ids.iter().copied()),
            }
        }
        out
    }

    /// Applies `f` to every child reference.
    pub fn map_children(&mut self, mut f: impl FnMut(NodeId) -> NodeId) {
        for slot in self.slots_mut() {
            match slot {
                SlotMut::One(id) => *id = f(*id),
                SlotMut::Opt(id) => {
                    if let Some(id) = id {
                        *id = f(*id);
                    }
                }
                SlotMut::Many(ids) => {
                    for id in ids {
                        *id = f(*id);
                    }
                }
            }
        }
    }

    /// Returns a copy whose children are all [`NodeId::PLACEHOLDER`], so
    /// that two kinds can be compared or hashed by their own attributes.
    #[must_use]
    pub(crate) fn shape(&self) -> Self {
        let mut shape = self.clone();
        shape.map_children(|_| NodeId::PLACEHOLDER);
        shape
    }

    /// Returns true for nodes that can appear in a `FROM` clause.
    #[must_use]
    pub const fn is_table_source(&self) -> bool {
        matches!(
            self,
            Self::ExprTableSource { .. }
                | Self::JoinTableSource { .. }
                | Self::SubqueryTableSource { .. }
                | Self::LateralView { .. }
        )
    }

    /// Returns true for literal values.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_)
                | Self::Number(_)
                | Self::Decimal(_)
                | Self::Char(_)
                | Self::NChar(_)
                | Self::Introducer { .. }
                | Self::Hex(_)
                | Self::Bits(_)
                | Self::Boolean(_)
                | Self::Null
                | Self::TypedLiteral { .. }
        )
    }

    /// Returns the binding strength used by the printer.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } | Self::BinaryGroup { op, .. } => op.precedence(),
            Self::Not { .. } => ops::NOT,
            Self::Between { .. } | Self::InList { .. } | Self::InSubquery { .. } => {
                ops::RELATIONAL
            }
            Self::Unary { .. } => ops::UNARY,
            Self::Integer(v) if *v < 0 => ops::UNARY,
            _ => ops::PRIMARY,
        }
    }

    /// Returns the variant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Number(_) => "Number",
            Self::Decimal(_) => "Decimal",
            Self::Char(_) => "Char",
            Self::NChar(_) => "NChar",
            Self::Introducer { .. } => "Introducer",
            Self::Hex(_) => "Hex",
            Self::Bits(_) => "Bits",
            Self::Boolean(_) => "Boolean",
            Self::Null => "Null",
            Self::Default => "Default",
            Self::TypedLiteral { .. } => "TypedLiteral",
            Self::Variant { .. } => "Variant",
            Self::CurrentUser => "CurrentUser",
            Self::Identifier(_) => "Identifier",
            Self::Property { .. } => "Property",
            Self::AllColumn { .. } => "AllColumn",
            Self::Binary { .. } => "Binary",
            Self::BinaryGroup { .. } => "BinaryGroup",
            Self::Unary { .. } => "Unary",
            Self::Not { .. } => "Not",
            Self::Between { .. } => "Between",
            Self::InList { .. } => "InList",
            Self::InSubquery { .. } => "InSubquery",
            Self::Exists { .. } => "Exists",
            Self::Quantified { .. } => "Quantified",
            Self::Case { .. } => "Case",
            Self::CaseWhen { .. } => "CaseWhen",
            Self::Cast { .. } => "Cast",
            Self::Interval { .. } => "Interval",
            Self::Collate { .. } => "Collate",
            Self::List { .. } => "List",
            Self::ArrayLiteral { .. } => "ArrayLiteral",
            Self::Index { .. } => "Index",
            Self::Subquery { .. } => "Subquery",
            Self::Sequence { .. } => "Sequence",
            Self::CurrentOf { .. } => "CurrentOf",
            Self::GroupingSets { .. } => "GroupingSets",
            Self::MatchAgainst { .. } => "MatchAgainst",
            Self::MethodInvoke { .. } => "MethodInvoke",
            Self::Aggregate { .. } => "Aggregate",
            Self::Over { .. } => "Over",
            Self::WindowFrame { .. } => "WindowFrame",
            Self::FrameBound { .. } => "FrameBound",
            Self::DataType { .. } => "DataType",
            Self::StructField { .. } => "StructField",
            Self::SelectStatement { .. } => "SelectStatement",
            Self::Query { .. } => "Query",
            Self::QueryBlock { .. } => "QueryBlock",
            Self::SelectItem { .. } => "SelectItem",
            Self::SetOperation { .. } => "SetOperation",
            Self::With { .. } => "With",
            Self::WithEntry { .. } => "WithEntry",
            Self::OrderBy { .. } => "OrderBy",
            Self::OrderItem { .. } => "OrderItem",
            Self::GroupBy { .. } => "GroupBy",
            Self::Limit { .. } => "Limit",
            Self::ExprTableSource { .. } => "ExprTableSource",
            Self::JoinTableSource { .. } => "JoinTableSource",
            Self::SubqueryTableSource { .. } => "SubqueryTableSource",
            Self::LateralView { .. } => "LateralView",
        }
    }

    /// Returns the node's own attribute as short text, for tree dumps.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Integer(v) => Some(v.to_string()),
            Self::Number(s)
            | Self::Decimal(s)
            | Self::Char(s)
            | Self::NChar(s)
            | Self::Hex(s)
            | Self::Bits(s)
            | Self::Identifier(s)
            | Self::CurrentOf { cursor: s }
            | Self::Collate { collation: s, .. } => Some(s.clone()),
            Self::Introducer { charset, value } => Some(format!("{charset} {value}")),
            Self::Boolean(b) => Some(b.to_string()),
            Self::TypedLiteral { kind, value } => Some(format!("{} {value}", kind.as_str())),
            Self::Variant { name, .. } => Some(name.clone()),
            Self::Property { name, .. }
            | Self::MethodInvoke { name, .. }
            | Self::Aggregate { name, .. }
            | Self::DataType { name, .. }
            | Self::StructField { name, .. }
            | Self::WithEntry { name, .. } => Some(name.clone()),
            Self::Binary { op, .. } | Self::BinaryGroup { op, .. } => Some(op.as_str().to_string()),
            Self::Unary { op, .. } => Some(op.as_str().trim_end().to_string()),
            Self::Quantified { quantifier, .. } => Some(quantifier.as_str().to_string()),
            Self::Sequence { function, .. } => Some(function.as_str().to_string()),
            Self::Interval { unit, .. } => unit.clone(),
            Self::SetOperation { op, .. } => Some(op.as_str().to_string()),
            Self::JoinTableSource { join_type, .. } => Some(join_type.as_str().to_string()),
            Self::SelectItem { alias, .. }
            | Self::ExprTableSource { alias, .. }
            | Self::SubqueryTableSource { alias, .. }
            | Self::LateralView { alias, .. } => alias.clone(),
            _ => None,
        }
    }
}

/// Storage width of an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegerWidth {
    /// Fits in 32 bits.
    Int,
    /// Fits in 64 bits.
    Long,
    /// Needs more than 64 bits.
    Big,
}

impl IntegerWidth {
    /// Returns the narrowest width holding `value`.
    #[must_use]
    pub fn of(value: i128) -> Self {
        if i32::try_from(value).is_ok() {
            Self::Int
        } else if i64::try_from(value).is_ok() {
            Self::Long
        } else {
            Self::Big
        }
    }
}
