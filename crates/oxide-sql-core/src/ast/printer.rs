//! SQL text output for AST nodes.
//!
//! Keywords are printed in upper case and names as written. Parentheses
//! are emitted where the source had them and wherever operator
//! precedence requires them, so printing and re-parsing the output yields
//! a structurally equal tree.

use std::fmt;

use serde::Serialize;

use super::arena::Ast;
use super::node::{BoundKind, JoinType, NodeId, NodeKind, NullsOrder, SortDirection};
use super::ops::{self, UnaryOp};

/// How string literals are escaped on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum StringStyle {
    /// Only `'` is special and is doubled.
    #[default]
    Standard,
    /// Backslash is an escape character and is doubled as well.
    Backslash,
}

impl Ast {
    /// Returns the SQL text of the subtree rooted at `id`.
    #[must_use]
    pub fn to_sql(&self, id: NodeId) -> String {
        self.to_sql_with(id, StringStyle::Standard)
    }

    /// Returns the SQL text of `id`, escaping strings per `style`.
    #[must_use]
    pub fn to_sql_with(&self, id: NodeId, style: StringStyle) -> String {
        let mut writer = SqlWriter {
            ast: self,
            style,
            out: String::new(),
        };
        writer.node(id);
        writer.out
    }

    /// Returns a [`fmt::Display`] adapter for `id`.
    #[must_use]
    pub const fn display(&self, id: NodeId) -> SqlDisplay<'_> {
        SqlDisplay { ast: self, id }
    }
}

/// Displays a node as SQL.
#[derive(Debug, Clone, Copy)]
pub struct SqlDisplay<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl fmt::Display for SqlDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ast.to_sql(self.id))
    }
}

struct SqlWriter<'a> {
    ast: &'a Ast,
    style: StringStyle,
    out: String,
}

impl SqlWriter<'_> {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn node(&mut self, id: NodeId) {
        let kind = self.ast.kind(id);
        let own_parens = matches!(kind, NodeKind::List { .. } | NodeKind::Subquery { .. });
        if self.ast.is_parenthesized(id) && !own_parens {
            self.push("(");
            self.kind(kind);
            self.push(")");
        } else {
            self.kind(kind);
        }
    }

    /// Prints an operand that must bind at least as tightly as `min`.
    fn operand(&mut self, id: NodeId, min: u8) {
        let kind = self.ast.kind(id);
        if !self.ast.is_parenthesized(id) && kind.precedence() < min {
            self.push("(");
            self.kind(kind);
            self.push(")");
        } else {
            self.node(id);
        }
    }

    fn list(&mut self, ids: &[NodeId]) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.node(*id);
        }
    }

    fn opt(&mut self, prefix: &str, id: Option<NodeId>) {
        if let Some(id) = id {
            self.push(prefix);
            self.node(id);
        }
    }

    fn string(&mut self, value: &str) {
        self.out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => self.push("''"),
                '\\' if self.style == StringStyle::Backslash => self.push("\\\\"),
                c => self.out.push(c),
            }
        }
        self.out.push('\'');
    }

    fn query_operand(&mut self, id: NodeId, right: bool) {
        let wrap = match self.ast.kind(id) {
            NodeKind::Query { .. } => true,
            NodeKind::SetOperation { .. } => right,
            _ => false,
        };
        if wrap && !self.ast.is_parenthesized(id) {
            self.push("(");
            self.node(id);
            self.push(")");
        } else {
            self.node(id);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn kind(&mut self, kind: &NodeKind) {
        match kind {
            NodeKind::Integer(v) => self.push(&v.to_string()),
            NodeKind::Number(s) => self.push(s),
            NodeKind::Decimal(s) => {
                self.push("DECIMAL ");
                self.string(s);
            }
            NodeKind::Char(s) => self.string(s),
            NodeKind::NChar(s) => {
                self.push("N");
                self.string(s);
            }
            NodeKind::Introducer { charset, value } => {
                self.push(charset);
                self.push(" ");
                self.string(value);
            }
            NodeKind::Hex(s) => self.push(&format!("X'{s}'")),
            NodeKind::Bits(s) => self.push(&format!("B'{s}'")),
            NodeKind::Boolean(b) => self.push(if *b { "TRUE" } else { "FALSE" }),
            NodeKind::Null => self.push("NULL"),
            NodeKind::Default => self.push("DEFAULT"),
            NodeKind::TypedLiteral { kind, value } => {
                self.push(kind.as_str());
                self.push(" ");
                self.string(value);
            }
            NodeKind::Variant { name, .. } | NodeKind::Identifier(name) => self.push(name),
            NodeKind::CurrentUser => self.push("CURRENT_USER"),
            NodeKind::Property { owner, name } => {
                self.operand(*owner, ops::PRIMARY);
                self.push(".");
                self.push(name);
            }
            NodeKind::AllColumn {
                owner,
                except,
                replace,
            } => {
                if let Some(owner) = owner {
                    self.operand(*owner, ops::PRIMARY);
                    self.push(".");
                }
                self.push("*");
                if !except.is_empty() {
                    self.push(" EXCEPT(");
                    self.list(except);
                    self.push(")");
                }
                if !replace.is_empty() {
                    self.push(" REPLACE(");
                    self.list(replace);
                    self.push(")");
                }
            }
            NodeKind::Binary { op, left, right } => {
                let prec = op.precedence();
                self.operand(*left, prec);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.operand(*right, prec + 1);
            }
            NodeKind::BinaryGroup { op, items } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(" ");
                        self.push(op.as_str());
                        self.push(" ");
                    }
                    self.operand(*item, op.precedence() + 1);
                }
            }
            NodeKind::Unary { op, operand } => {
                self.push(op.as_str());
                let start = self.out.len();
                self.operand(*operand, ops::UNARY);
                let signed = self.out[start..].starts_with(['-', '+']);
                if signed && matches!(op, UnaryOp::Negative | UnaryOp::Plus) {
                    self.out.insert(start, ' ');
                }
            }
            NodeKind::Not { operand } => {
                self.push("NOT ");
                self.operand(*operand, ops::NOT);
            }
            NodeKind::Between {
                expr,
                low,
                high,
                not,
            } => {
                self.operand(*expr, ops::RELATIONAL);
                self.push(if *not { " NOT BETWEEN " } else { " BETWEEN " });
                self.operand(*low, ops::RELATIONAL + 1);
                self.push(" AND ");
                self.operand(*high, ops::RELATIONAL + 1);
            }
            NodeKind::InList {
                expr,
                items,
                not,
                global,
            } => {
                self.operand(*expr, ops::RELATIONAL);
                self.in_keyword(*not, *global);
                self.push("(");
                self.list(items);
                self.push(")");
            }
            NodeKind::InSubquery {
                expr,
                query,
                not,
                global,
            } => {
                self.operand(*expr, ops::RELATIONAL);
                self.in_keyword(*not, *global);
                self.push("(");
                self.node(*query);
                self.push(")");
            }
            NodeKind::Exists { query, not } => {
                self.push(if *not { "NOT EXISTS (" } else { "EXISTS (" });
                self.node(*query);
                self.push(")");
            }
            NodeKind::Quantified { quantifier, query } => {
                self.push(quantifier.as_str());
                self.push(" (");
                self.node(*query);
                self.push(")");
            }
            NodeKind::Case {
                value,
                whens,
                else_result,
            } => {
                self.push("CASE");
                self.opt(" ", *value);
                for when in whens {
                    self.push(" ");
                    self.node(*when);
                }
                self.opt(" ELSE ", *else_result);
                self.push(" END");
            }
            NodeKind::CaseWhen { condition, result } => {
                self.push("WHEN ");
                self.node(*condition);
                self.push(" THEN ");
                self.node(*result);
            }
            NodeKind::Cast {
                expr,
                data_type,
                try_cast,
                postfix,
            } => {
                if *postfix {
                    self.operand(*expr, ops::PRIMARY);
                    self.push("::");
                    self.node(*data_type);
                } else {
                    self.push(if *try_cast { "TRY_CAST(" } else { "CAST(" });
                    self.node(*expr);
                    self.push(" AS ");
                    self.node(*data_type);
                    self.push(")");
                }
            }
            NodeKind::Interval { value, unit } => {
                self.push("INTERVAL ");
                self.node(*value);
                if let Some(unit) = unit {
                    self.push(" ");
                    self.push(unit);
                }
            }
            NodeKind::Collate { expr, collation } => {
                self.operand(*expr, ops::PRIMARY);
                self.push(" COLLATE ");
                self.push(collation);
            }
            NodeKind::List { items } => {
                self.push("(");
                self.list(items);
                self.push(")");
            }
            NodeKind::ArrayLiteral {
                items,
                prefixed,
                element_type,
            } => {
                if *prefixed {
                    self.push("ARRAY");
                }
                if let Some(ty) = element_type {
                    self.push("<");
                    self.node(*ty);
                    self.push(">");
                }
                self.push("[");
                self.list(items);
                self.push("]");
            }
            NodeKind::Index { expr, index } => {
                self.operand(*expr, ops::PRIMARY);
                self.push("[");
                self.node(*index);
                self.push("]");
            }
            NodeKind::Subquery { query } => {
                self.push("(");
                self.node(*query);
                self.push(")");
            }
            NodeKind::Sequence { name, function } => {
                self.operand(*name, ops::PRIMARY);
                self.push(".");
                self.push(function.as_str());
            }
            NodeKind::CurrentOf { cursor } => {
                self.push("CURRENT OF ");
                self.push(cursor);
            }
            NodeKind::GroupingSets { items } => {
                self.push("GROUPING SETS (");
                self.list(items);
                self.push(")");
            }
            NodeKind::MatchAgainst {
                columns,
                against,
                modifier,
            } => {
                self.push("MATCH (");
                self.list(columns);
                self.push(") AGAINST (");
                self.node(*against);
                if let Some(modifier) = modifier {
                    self.push(" ");
                    self.push(modifier);
                }
                self.push(")");
            }
            NodeKind::MethodInvoke {
                owner,
                name,
                args,
                curried,
                trim,
                from,
                for_expr,
                using,
            } => {
                if let Some(owner) = owner {
                    self.operand(*owner, ops::PRIMARY);
                    self.push(".");
                }
                self.push(name);
                self.push("(");
                if let Some(trim) = trim {
                    self.push(trim.as_str());
                    self.push(" ");
                }
                self.list(args);
                let lead = if args.is_empty() { "" } else { " " };
                if let Some(from) = from {
                    self.push(lead);
                    self.push("FROM ");
                    self.node(*from);
                }
                self.opt(" FOR ", *for_expr);
                if let Some(using) = using {
                    self.push(lead);
                    self.push("USING ");
                    self.node(*using);
                }
                self.push(")");
                if let Some(curried) = curried {
                    self.push("(");
                    self.list(curried);
                    self.push(")");
                }
            }
            NodeKind::Aggregate {
                name,
                quantifier,
                args,
                curried,
                order_by,
                separator,
                limit,
                nulls,
                within_group,
                filter,
                over,
            } => {
                self.push(name);
                self.push("(");
                if let Some(q) = quantifier {
                    self.push(q.as_str());
                    self.push(" ");
                }
                self.list(args);
                self.opt(" ", *order_by);
                self.opt(" SEPARATOR ", *separator);
                self.opt(" LIMIT ", *limit);
                self.push(")");
                if let Some(curried) = curried {
                    self.push("(");
                    self.list(curried);
                    self.push(")");
                }
                if let Some(nulls) = nulls {
                    self.push(" ");
                    self.push(nulls.as_str());
                }
                if let Some(order) = within_group {
                    self.push(" WITHIN GROUP (");
                    self.node(*order);
                    self.push(")");
                }
                if let Some(filter) = filter {
                    self.push(" FILTER (WHERE ");
                    self.node(*filter);
                    self.push(")");
                }
                self.opt(" ", *over);
            }
            NodeKind::Over {
                name,
                partition_by,
                order_by,
                frame,
            } => {
                self.push("OVER ");
                if let Some(name) = name {
                    self.push(name);
                    return;
                }
                self.push("(");
                let mut sep = "";
                if !partition_by.is_empty() {
                    self.push("PARTITION BY ");
                    self.list(partition_by);
                    sep = " ";
                }
                if let Some(order) = order_by {
                    self.push(sep);
                    self.node(*order);
                    sep = " ";
                }
                if let Some(frame) = frame {
                    self.push(sep);
                    self.node(*frame);
                }
                self.push(")");
            }
            NodeKind::WindowFrame { unit, start, end } => {
                self.push(unit.as_str());
                self.push(" ");
                if let Some(end) = end {
                    self.push("BETWEEN ");
                    self.node(*start);
                    self.push(" AND ");
                    self.node(*end);
                } else {
                    self.node(*start);
                }
            }
            NodeKind::FrameBound { bound, offset } => {
                if let Some(offset) = offset {
                    self.operand(*offset, ops::PRIMARY);
                    self.push(" ");
                }
                self.push(match bound {
                    BoundKind::UnboundedPreceding => "UNBOUNDED PRECEDING",
                    BoundKind::UnboundedFollowing => "UNBOUNDED FOLLOWING",
                    BoundKind::CurrentRow => "CURRENT ROW",
                    BoundKind::Preceding => "PRECEDING",
                    BoundKind::Following => "FOLLOWING",
                });
            }
            NodeKind::DataType {
                name,
                args,
                type_args,
                modifiers,
            } => {
                self.push(name);
                if !type_args.is_empty() {
                    self.push("<");
                    self.list(type_args);
                    self.push(">");
                }
                if !args.is_empty() {
                    self.push("(");
                    self.list(args);
                    self.push(")");
                }
                for modifier in modifiers {
                    if !modifier.starts_with('[') {
                        self.push(" ");
                    }
                    self.push(modifier);
                }
            }
            NodeKind::StructField { name, data_type } => {
                self.push(name);
                self.push(": ");
                self.node(*data_type);
            }
            NodeKind::SelectStatement { query } => self.node(*query),
            NodeKind::Query {
                with,
                body,
                order_by,
                limit,
            } => {
                if let Some(with) = with {
                    self.node(*with);
                    self.push(" ");
                }
                self.node(*body);
                self.opt(" ", *order_by);
                self.opt(" ", *limit);
            }
            NodeKind::QueryBlock {
                quantifier,
                items,
                from,
                where_clause,
                group_by,
                having,
            } => {
                self.push("SELECT ");
                if let Some(q) = quantifier {
                    self.push(q.as_str());
                    self.push(" ");
                }
                self.list(items);
                self.opt(" FROM ", *from);
                self.opt(" WHERE ", *where_clause);
                self.opt(" ", *group_by);
                self.opt(" HAVING ", *having);
            }
            NodeKind::SelectItem { expr, alias } => {
                self.node(*expr);
                if let Some(alias) = alias {
                    self.push(" AS ");
                    self.push(alias);
                }
            }
            NodeKind::SetOperation { op, left, right } => {
                self.query_operand(*left, false);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.query_operand(*right, true);
            }
            NodeKind::With { recursive, entries } => {
                self.push(if *recursive { "WITH RECURSIVE " } else { "WITH " });
                self.list(entries);
            }
            NodeKind::WithEntry {
                name,
                columns,
                query,
            } => {
                self.push(name);
                if !columns.is_empty() {
                    self.push(" (");
                    self.push(&columns.join(", "));
                    self.push(")");
                }
                self.push(" AS (");
                self.node(*query);
                self.push(")");
            }
            NodeKind::OrderBy { items } => {
                self.push("ORDER BY ");
                self.list(items);
            }
            NodeKind::OrderItem {
                expr,
                direction,
                nulls,
            } => {
                self.node(*expr);
                match direction {
                    Some(SortDirection::Asc) => self.push(" ASC"),
                    Some(SortDirection::Desc) => self.push(" DESC"),
                    None => {}
                }
                match nulls {
                    Some(NullsOrder::First) => self.push(" NULLS FIRST"),
                    Some(NullsOrder::Last) => self.push(" NULLS LAST"),
                    None => {}
                }
            }
            NodeKind::GroupBy { items, rollup } => {
                self.push("GROUP BY ");
                self.list(items);
                if *rollup {
                    self.push(" WITH ROLLUP");
                }
            }
            NodeKind::Limit { count, offset } => {
                self.push("LIMIT ");
                self.node(*count);
                self.opt(" OFFSET ", *offset);
            }
            NodeKind::ExprTableSource { expr, alias } => {
                self.node(*expr);
                self.alias(alias.as_deref());
            }
            NodeKind::JoinTableSource {
                left,
                right,
                join_type,
                natural,
                condition,
                using,
            } => {
                self.node(*left);
                if *join_type == JoinType::Comma {
                    self.push(", ");
                } else {
                    self.push(if *natural { " NATURAL " } else { " " });
                    self.push(join_type.as_str());
                    self.push(" ");
                }
                let nested = matches!(self.ast.kind(*right), NodeKind::JoinTableSource { .. });
                if nested && !self.ast.is_parenthesized(*right) {
                    self.push("(");
                    self.node(*right);
                    self.push(")");
                } else {
                    self.node(*right);
                }
                self.opt(" ON ", *condition);
                if !using.is_empty() {
                    self.push(" USING (");
                    self.list(using);
                    self.push(")");
                }
            }
            NodeKind::SubqueryTableSource { query, alias } => {
                self.push("(");
                self.node(*query);
                self.push(")");
                self.alias(alias.as_deref());
            }
            NodeKind::LateralView {
                source,
                function,
                outer,
                alias,
                columns,
            } => {
                self.node(*source);
                self.push(if *outer {
                    " LATERAL VIEW OUTER "
                } else {
                    " LATERAL VIEW "
                });
                self.node(*function);
                self.alias(alias.as_deref());
                if !columns.is_empty() {
                    self.push(" AS ");
                    self.push(&columns.join(", "));
                }
            }
        }
    }

    fn in_keyword(&mut self, not: bool, global: bool) {
        self.push(match (global, not) {
            (false, false) => " IN ",
            (false, true) => " NOT IN ",
            (true, false) => " GLOBAL IN ",
            (true, true) => " GLOBAL NOT IN ",
        });
    }

    fn alias(&mut self, alias: Option<&str>) {
        if let Some(alias) = alias {
            self.push(" ");
            self.push(alias);
        }
    }
}
