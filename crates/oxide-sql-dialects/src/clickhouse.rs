//! ClickHouse.

use std::sync::LazyLock;

use oxide_sql_core::ast::NodeId;
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::dialect::{AggregateTable, Dialect, HookResult};
use oxide_sql_core::lexer::LexerConfig;
use oxide_sql_core::parser::ExprParser;

use crate::support::postfix_cast;

/// ClickHouse aggregate functions, including the parametric ones called
/// as `quantile(0.5)(x)`.
pub static CLICKHOUSE_AGGREGATES: LazyLock<AggregateTable> = LazyLock::new(|| {
    AggregateTable::new(&[
        "any",
        "anyHeavy",
        "anyLast",
        "argMax",
        "argMin",
        "avg",
        "count",
        "groupArray",
        "groupBitAnd",
        "groupBitOr",
        "groupUniqArray",
        "histogram",
        "max",
        "median",
        "min",
        "quantile",
        "quantileExact",
        "quantiles",
        "sequenceCount",
        "sequenceMatch",
        "sum",
        "sumMap",
        "topK",
        "uniq",
        "uniqCombined",
        "uniqExact",
        "windowFunnel",
    ])
});

/// Lexical rules of ClickHouse.
pub const CLICKHOUSE_LEXER: LexerConfig = LexerConfig {
    backslash_escapes: true,
    backtick_identifiers: true,
    ..LexerConfig::ANSI
};

/// The ClickHouse dialect: backtick names, `::` casts and parametric
/// aggregates. `GLOBAL IN` is part of the base grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickHouseDialect;

impl ClickHouseDialect {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for ClickHouseDialect {
    fn name(&self) -> &'static str {
        DbType::ClickHouse.name()
    }

    fn db_type(&self) -> DbType {
        DbType::ClickHouse
    }

    fn lexer_config(&self) -> LexerConfig {
        CLICKHOUSE_LEXER
    }

    fn aggregate_functions(&self) -> &AggregateTable {
        &CLICKHOUSE_AGGREGATES
    }

    fn primary_rest(&self, p: &mut ExprParser<'_>, expr: NodeId) -> HookResult<NodeId> {
        postfix_cast(p, expr)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use oxide_sql_core::ast::NodeKind;
    use oxide_sql_core::feature::Features;
    use oxide_sql_core::parser::{ParsedExpr, parse_expression};

    fn parse(sql: &str) -> ParsedExpr {
        parse_expression(sql, Arc::new(ClickHouseDialect::new()), Features::empty()).unwrap()
    }

    #[test]
    fn test_parametric_aggregate() {
        let parsed = parse("quantile(0.9)(latency)");
        let NodeKind::Aggregate { args, curried, .. } = parsed.ast.kind(parsed.root) else {
            panic!("expected aggregate");
        };
        assert_eq!(args.len(), 1);
        assert_eq!(curried.as_ref().map(Vec::len), Some(1));
        assert_eq!(parsed.ast.to_sql(parsed.root), "quantile(0.9)(latency)");
    }

    #[test]
    fn test_global_in_and_cast() {
        let parsed = parse("`id`::UInt64 GLOBAL IN (SELECT id FROM t)");
        assert!(matches!(
            parsed.ast.kind(parsed.root),
            NodeKind::InSubquery { global: true, .. }
        ));
    }

    #[test]
    fn test_aggregate_names_are_case_insensitive() {
        assert!(CLICKHOUSE_AGGREGATES.contains_name("UNIQEXACT"));
        assert!(CLICKHOUSE_AGGREGATES.collisions().is_empty());
    }
}
