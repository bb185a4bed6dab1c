//! PostgreSQL and its derivatives (Greenplum, EDB, Hologres, ...).

use std::sync::LazyLock;

use oxide_sql_core::ast::{BinaryOp, NodeId};
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::dialect::{AggregateTable, Dialect, HookOutcome, HookResult};
use oxide_sql_core::lexer::{LexerConfig, TokenKind};
use oxide_sql_core::parser::{DataTypeSpec, ExprParser};

use crate::support::{infix, postfix_cast};

/// PostgreSQL aggregate and window functions.
pub static POSTGRES_AGGREGATES: LazyLock<AggregateTable> = LazyLock::new(|| {
    AggregateTable::new(&[
        "ARRAY_AGG",
        "AVG",
        "BIT_AND",
        "BIT_OR",
        "BOOL_AND",
        "BOOL_OR",
        "COUNT",
        "CUME_DIST",
        "DENSE_RANK",
        "EVERY",
        "JSON_AGG",
        "JSONB_AGG",
        "MAX",
        "MIN",
        "PERCENT_RANK",
        "PERCENTILE_CONT",
        "PERCENTILE_DISC",
        "RANK",
        "ROW_NUMBER",
        "STDDEV",
        "STRING_AGG",
        "SUM",
    ])
});

/// Lexical rules of the PostgreSQL family.
pub const POSTGRES_LEXER: LexerConfig = LexerConfig {
    dollar_quoted_strings: true,
    escape_strings: true,
    json_operators: true,
    ..LexerConfig::ANSI
};

/// The PostgreSQL dialect.
///
/// Adds `::` casts, the regex operators `~ ~* !~ !~*`, `~=`, `?` and
/// `[]` array type suffixes. `&&` is the array overlap operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostgresDialect {
    db_type: DbType,
}

impl PostgresDialect {
    /// Creates a PostgreSQL-family dialect for `db_type`.
    #[must_use]
    pub const fn new(db_type: DbType) -> Self {
        Self { db_type }
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new(DbType::PostgreSql)
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        self.db_type.name()
    }

    fn db_type(&self) -> DbType {
        self.db_type
    }

    fn lexer_config(&self) -> LexerConfig {
        POSTGRES_LEXER
    }

    fn aggregate_functions(&self) -> &AggregateTable {
        &POSTGRES_AGGREGATES
    }

    fn primary_rest(&self, p: &mut ExprParser<'_>, expr: NodeId) -> HookResult<NodeId> {
        postfix_cast(p, expr)
    }

    fn parse_data_type_rest(
        &self,
        p: &mut ExprParser<'_>,
        spec: &mut DataTypeSpec,
    ) -> HookResult<()> {
        let mut handled = false;
        while p.is(&TokenKind::LeftBracket) {
            let mark = p.mark();
            p.next_token();
            if !p.eat(&TokenKind::RightBracket) {
                p.reset(mark);
                break;
            }
            spec.modifiers.push(String::from("[]"));
            handled = true;
        }
        Ok(if handled {
            HookOutcome::Handled(())
        } else {
            HookOutcome::NotApplicable
        })
    }

    fn relational_rest_ques(&self, p: &mut ExprParser<'_>, left: NodeId) -> HookResult<NodeId> {
        infix(p, left, BinaryOp::JsonContains)
    }

    fn relational_rest_tilde(&self, p: &mut ExprParser<'_>, left: NodeId) -> HookResult<NodeId> {
        infix(p, left, BinaryOp::RegexMatch)
    }

    fn relational_rest_tilde_star(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        infix(p, left, BinaryOp::RegexMatchInsensitive)
    }

    fn relational_rest_bang_tilde(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        infix(p, left, BinaryOp::RegexNotMatch)
    }

    fn relational_rest_bang_tilde_star(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        infix(p, left, BinaryOp::RegexNotMatchInsensitive)
    }

    fn relational_rest_tilde_eq(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        infix(p, left, BinaryOp::SameAs)
    }

    fn relational_rest_bang(&self, _p: &mut ExprParser<'_>, _left: NodeId) -> HookResult<NodeId> {
        Ok(HookOutcome::Unsupported(String::from(
            "postfix factorial operator",
        )))
    }

    fn and_rest_get_operator(&self) -> BinaryOp {
        BinaryOp::PgAnd
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use oxide_sql_core::ast::NodeKind;
    use oxide_sql_core::feature::Features;
    use oxide_sql_core::parser::{ParsedExpr, SqlError, parse_expression};

    fn parse(sql: &str) -> ParsedExpr {
        parse_expression(sql, Arc::new(PostgresDialect::default()), Features::empty()).unwrap()
    }

    fn sql(text: &str) -> String {
        let parsed = parse(text);
        parsed.ast.to_sql(parsed.root)
    }

    fn root_op(text: &str) -> BinaryOp {
        let parsed = parse(text);
        match parsed.ast.kind(parsed.root) {
            NodeKind::Binary { op, .. } => *op,
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_postfix_casts_chain() {
        let parsed = parse("a::int::text");
        let NodeKind::Cast {
            expr, postfix, ..
        } = parsed.ast.kind(parsed.root)
        else {
            panic!("expected cast");
        };
        assert!(*postfix);
        assert!(matches!(parsed.ast.kind(*expr), NodeKind::Cast { .. }));
        assert_eq!(sql("a::int::text"), "a::INT::TEXT");
    }

    #[test]
    fn test_array_type_suffix() {
        assert_eq!(sql("x::int[]"), "x::INT[]");
        assert_eq!(sql("CAST(x AS text[][])"), "CAST(x AS TEXT[][])");
    }

    #[test]
    fn test_regex_operators() {
        assert_eq!(root_op("a ~ 'x'"), BinaryOp::RegexMatch);
        assert_eq!(root_op("a ~* 'x'"), BinaryOp::RegexMatchInsensitive);
        assert_eq!(root_op("a !~ 'x'"), BinaryOp::RegexNotMatch);
        assert_eq!(root_op("a !~* 'x'"), BinaryOp::RegexNotMatchInsensitive);
        assert_eq!(root_op("a ~= b"), BinaryOp::SameAs);
        assert_eq!(root_op("a ? 'k'"), BinaryOp::JsonContains);
        assert_eq!(root_op("a && b"), BinaryOp::PgAnd);
        assert_eq!(root_op("a SIMILAR TO 'x%'"), BinaryOp::SimilarTo);
    }

    #[test]
    fn test_string_forms() {
        let parsed = parse("E'a\\nb' || $$raw$$");
        let NodeKind::Binary { left, right, .. } = parsed.ast.kind(parsed.root) else {
            panic!("expected binary");
        };
        assert!(matches!(parsed.ast.kind(*left), NodeKind::Char(v) if v == "a\nb"));
        assert!(matches!(parsed.ast.kind(*right), NodeKind::Char(v) if v == "raw"));
    }

    #[test]
    fn test_postfix_bang_is_unsupported() {
        let err = parse_expression("5 ! 3", Arc::new(PostgresDialect::default()), Features::empty())
            .unwrap_err();
        assert!(matches!(err, SqlError::Unsupported { .. }));
        assert!(err.to_string().starts_with("not supported. "));
    }

    #[test]
    fn test_window_aggregates() {
        let parsed = parse("percentile_cont(0.5) WITHIN GROUP (ORDER BY x)");
        assert!(matches!(
            parsed.ast.kind(parsed.root),
            NodeKind::Aggregate { within_group: Some(_), .. }
        ));
        assert!(POSTGRES_AGGREGATES.collisions().is_empty());
    }
}
