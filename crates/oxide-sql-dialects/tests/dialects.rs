//! Cross-dialect tests through the provider registry: printing is a
//! fixed point, and providers override the built-in dispatch.

use std::sync::Arc;

use oxide_sql_core::dialect::GenericDialect;
use oxide_sql_core::parser::StatementParser;
use oxide_sql_core::{DbType, Features};
use oxide_sql_dialects::{DialectProvider, ProviderRegistry, builtin_dialect};

fn print(registry: &ProviderRegistry, db_type: DbType, sql: &str) -> String {
    let mut parser = registry.create_statement_parser(db_type, sql, Features::empty());
    let style = parser.expr_parser().dialect().string_style();
    let statements = parser
        .parse_statement_list()
        .unwrap_or_else(|e| panic!("Failed to parse ({db_type}): {sql}\nError: {e}"));
    let ast = parser.into_ast();
    statements
        .iter()
        .map(|id| ast.to_sql_with(*id, style))
        .collect::<Vec<_>>()
        .join("; ")
}

fn round_trip(db_type: DbType, sql: &str) {
    let registry = ProviderRegistry::new();
    let first = print(&registry, db_type, sql);
    let second = print(&registry, db_type, &first);
    assert_eq!(
        first, second,
        "Round-trip failed ({db_type}).\n  Input:    {sql}\n  First:    {first}\n  Second:   {second}"
    );
}

// ===================================================================
// Round trip per family
// ===================================================================

#[test]
fn round_trip_mysql() {
    round_trip(
        DbType::MySql,
        "SELECT `a`, BINARY b, _utf8mb4 'x' FROM t WHERE MATCH (c) AGAINST ('rust' IN BOOLEAN MODE) LIMIT 1, 2",
    );
    round_trip(
        DbType::MariaDb,
        "select group_concat(distinct a order by b separator ',') from t where d > now() - interval 1 day",
    );
    round_trip(DbType::TiDb, "SELECT \"it's\", 'a\\tb', CONVERT(a, CHAR(10)) FROM t");
}

#[test]
fn round_trip_postgres() {
    round_trip(
        DbType::PostgreSql,
        "SELECT payload::jsonb, tags::text[] FROM events WHERE name ~* '^a' AND payload ? 'k'",
    );
    round_trip(DbType::Greenplum, "SELECT E'a\\nb', $$raw$$ FROM t WHERE x !~ 'y'");
}

#[test]
fn round_trip_clickhouse() {
    round_trip(
        DbType::ClickHouse,
        "SELECT quantile(0.9)(latency), id::UInt64 FROM hits WHERE id GLOBAL IN (SELECT id FROM t)",
    );
}

#[test]
fn round_trip_sqlite() {
    round_trip(
        DbType::Sqlite,
        "SELECT [first name], `b` FROM t WHERE a GLOB 'x*' OR b NOT MATCH 'y'",
    );
}

#[test]
fn round_trip_hive() {
    round_trip(
        DbType::Hive,
        "SELECT a, b FROM t LATERAL VIEW OUTER explode(xs) v1 AS a LATERAL VIEW posexplode(ys) v2 AS i, b WHERE a RLIKE 'x'",
    );
    round_trip(DbType::Spark, "SELECT * FROM t lateral");
}

#[test]
fn round_trip_generic_for_unmapped_types() {
    round_trip(DbType::Oracle, "SELECT a || b FROM t WHERE c IN (1, 2)");
}

// ===================================================================
// Providers
// ===================================================================

/// Parses every key with the generic grammar.
#[derive(Debug)]
struct GenericOnly;

impl DialectProvider for GenericOnly {
    fn create_statement_parser<'a>(
        &self,
        sql: &'a str,
        db_type: DbType,
        features: Features,
    ) -> Option<StatementParser<'a>> {
        Some(StatementParser::new(
            sql,
            Arc::new(GenericDialect::new(db_type)),
            features,
        ))
    }
}

#[test]
fn provider_overrides_builtin_until_unregistered() {
    let registry = ProviderRegistry::global();
    registry
        .register_provider("mysql", Arc::new(GenericOnly))
        .unwrap();

    // Backticks are not identifiers in the generic grammar.
    let mut parser = registry.create_statement_parser(DbType::MySql, "SELECT `a`", Features::empty());
    assert!(parser.parse_statement_list().is_err());
    // Other keys are untouched.
    let mut parser = registry.create_statement_parser(DbType::MariaDb, "SELECT `a`", Features::empty());
    assert!(parser.parse_statement_list().is_ok());

    assert!(registry.unregister_provider("mysql").is_some());
    let mut parser = registry.create_statement_parser(DbType::MySql, "SELECT `a`", Features::empty());
    assert!(parser.parse_statement_list().is_ok());
    assert_eq!(
        parser.expr_parser().dialect().lexer_config(),
        builtin_dialect(DbType::MySql).lexer_config()
    );
}
