#![allow(dead_code)]

use std::sync::Arc;

use oxide_sql_core::ast::{Ast, BinaryOp, NodeId, NodeKind};
use oxide_sql_core::dialect::{Dialect, GenericDialect};
use oxide_sql_core::feature::Features;
use oxide_sql_core::parser::{ParsedExpr, ParsedStatements, SqlError, parse_expression, parse_statement};

pub fn generic() -> Arc<dyn Dialect> {
    Arc::new(GenericDialect::default())
}

pub fn parse_expr(sql: &str) -> ParsedExpr {
    parse_expr_with(sql, generic(), Features::empty())
}

pub fn parse_expr_with(sql: &str, dialect: Arc<dyn Dialect>, features: Features) -> ParsedExpr {
    parse_expression(sql, dialect, features)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_expr_err(sql: &str) -> SqlError {
    parse_expression(sql, generic(), Features::empty())
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_stmt(sql: &str) -> ParsedStatements {
    parse_statement(sql, generic(), Features::empty())
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> SqlError {
    parse_statement(sql, generic(), Features::empty())
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Printed form of a parsed expression.
pub fn expr_sql(sql: &str) -> String {
    let parsed = parse_expr(sql);
    parsed.ast.to_sql(parsed.root)
}

/// Destructures a binary node.
pub fn binary(ast: &Ast, id: NodeId) -> (BinaryOp, NodeId, NodeId) {
    match ast.kind(id) {
        NodeKind::Binary { op, left, right } => (*op, *left, *right),
        other => panic!("Expected binary node, got {other:?}"),
    }
}

pub fn identifier(ast: &Ast, id: NodeId) -> &str {
    match ast.kind(id) {
        NodeKind::Identifier(name) => name,
        other => panic!("Expected identifier, got {other:?}"),
    }
}

/// Verifies that printing is a fixed point after the first pass:
/// print(parse(sql)) re-parses into a structurally equal tree that prints
/// the same text again.
pub fn round_trip(sql: &str) {
    let first = parse_stmt(sql);
    let rendered1 = first.ast.to_sql(first.statements[0]);
    let second = parse_stmt(&rendered1);
    let rendered2 = second.ast.to_sql(second.statements[0]);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert!(
        first
            .ast
            .structural_eq(first.statements[0], &second.ast, second.statements[0]),
        "Round-trip changed the tree for: {sql}"
    );
}
