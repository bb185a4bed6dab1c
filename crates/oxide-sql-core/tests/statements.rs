//! Tests for queries parsed through the statement entry points, the
//! print/parse fixed point and table collection.

mod common;
use common::*;

use oxide_sql_core::ast::NodeKind;
use oxide_sql_core::feature::Features;
use oxide_sql_core::parser::parse_statements;
use oxide_sql_core::visitor::{NodeCounter, TableCollector};

// ===================================================================
// Query structure
// ===================================================================

#[test]
fn select_statement_wraps_query() {
    let parsed = parse_stmt("SELECT a FROM t WHERE a > 1");
    let ast = &parsed.ast;
    let NodeKind::SelectStatement { query } = ast.kind(parsed.statements[0]) else {
        panic!("Expected statement");
    };
    let NodeKind::Query { body, .. } = ast.kind(*query) else {
        panic!("Expected query");
    };
    assert!(matches!(
        ast.kind(*body),
        NodeKind::QueryBlock {
            from: Some(_),
            where_clause: Some(_),
            ..
        }
    ));
    assert_eq!(ast.root_of(*body), parsed.statements[0]);
}

#[test]
fn select_join_tree_is_left_deep() {
    let parsed = parse_stmt("SELECT * FROM a JOIN b ON a.x = b.x JOIN c ON b.y = c.y");
    let ast = &parsed.ast;
    let NodeKind::SelectStatement { query } = ast.kind(parsed.statements[0]) else {
        panic!("Expected statement");
    };
    let NodeKind::Query { body, .. } = ast.kind(*query) else {
        panic!("Expected query");
    };
    let NodeKind::QueryBlock { from: Some(from), .. } = ast.kind(*body) else {
        panic!("Expected FROM");
    };
    let NodeKind::JoinTableSource { left, right, .. } = ast.kind(*from) else {
        panic!("Expected join, got {:?}", ast.kind(*from));
    };
    assert!(matches!(ast.kind(*left), NodeKind::JoinTableSource { .. }));
    assert!(matches!(ast.kind(*right), NodeKind::ExprTableSource { .. }));
    assert_eq!(ast.parent(*left), Some(*from));
}

#[test]
fn select_statement_list_shares_arena() {
    let parsed =
        parse_statements("SELECT 1; SELECT a FROM t;", generic(), Features::empty()).unwrap();
    assert_eq!(parsed.statements.len(), 2);
    assert_eq!(parsed.ast.to_sql(parsed.statements[0]), "SELECT 1");
    assert_eq!(parsed.ast.to_sql(parsed.statements[1]), "SELECT a FROM t");
}

// ===================================================================
// Round trip
// ===================================================================

#[test]
fn round_trip_clauses() {
    round_trip("select distinct a, b x from t where a > 1 group by a having count(*) > 1 order by a desc limit 3");
    round_trip("SELECT a FROM t LIMIT 5, 10");
}

#[test]
fn round_trip_joins_and_subqueries() {
    round_trip("SELECT * FROM a LEFT OUTER JOIN b USING (id) CROSS JOIN c");
    round_trip("SELECT x FROM (SELECT 1 AS x) s WHERE x IN (SELECT y FROM u)");
    round_trip("SELECT * FROM t WHERE EXISTS (SELECT 1 FROM u WHERE u.id = t.id)");
}

#[test]
fn round_trip_set_operations_and_with() {
    round_trip("WITH r AS (SELECT 1 AS n) SELECT n FROM r UNION ALL SELECT 2");
    round_trip("(SELECT 1) UNION (SELECT 2) ORDER BY 1");
}

#[test]
fn round_trip_expressions() {
    round_trip("SELECT (a + b) * c, a - (b - c), NOT (a = 1), -2147483648");
    round_trip("SELECT CASE a WHEN 1 THEN 'one' ELSE 'many' END FROM t");
    round_trip("SELECT a FROM t WHERE b LIKE 'x%' ESCAPE '!' AND c BETWEEN 1 AND 2");
    round_trip("SELECT CAST(a AS VARCHAR(10)), f(x)(y), 'it''s' FROM t");
    round_trip("SELECT row_number() OVER (PARTITION BY a ORDER BY b DESC) FROM t");
    round_trip("SELECT a FROM t WHERE a IS NOT DISTINCT FROM b OR c IS NULL");
}

// ===================================================================
// Table collection
// ===================================================================

#[test]
fn tables_from_joins_subqueries_and_ctes() {
    let parsed = parse_stmt(
        "WITH recent AS (SELECT * FROM events) \
         SELECT * FROM users u JOIN recent r ON u.id = r.uid \
         WHERE u.org IN (SELECT id FROM orgs)",
    );
    let tables = TableCollector::collect(&parsed.ast, parsed.statements[0]);
    assert_eq!(tables, vec!["events", "users", "orgs"]);
}

#[test]
fn tables_qualified_and_deduplicated() {
    let parsed = parse_stmt("SELECT * FROM db.t a, db.t b, other");
    let tables = TableCollector::collect(&parsed.ast, parsed.statements[0]);
    assert_eq!(tables, vec!["db.t", "other"]);
}

#[test]
fn visitor_role_hook_counts_sources() {
    let parsed = parse_stmt("SELECT * FROM a JOIN b ON a.id = b.id, (SELECT 1) s");
    let mut counter = NodeCounter::default();
    parsed.ast.accept(parsed.statements[0], &mut counter);
    // a, b, their join, the subquery source and the outer comma join.
    assert_eq!(counter.table_sources, 5);
    assert_eq!(counter.by_kind.get("SelectStatement"), Some(&1));
}
