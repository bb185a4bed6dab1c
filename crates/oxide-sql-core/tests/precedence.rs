//! Tests for the precedence ladder: associativity at every level,
//! relative binding strength and grouped logical chains.

mod common;
use common::*;

use oxide_sql_core::ast::{BinaryOp, NodeKind};
use oxide_sql_core::feature::{Feature, Features};

/// Asserts that `sql` (three operands joined by `op`) parses as
/// `(a op b) op c`.
fn assert_left_assoc(sql: &str, op: BinaryOp) {
    let parsed = parse_expr(sql);
    let ast = &parsed.ast;
    let (outer, left, right) = binary(ast, parsed.root);
    assert_eq!(outer, op, "{sql}");
    assert_eq!(identifier(ast, right), "c", "{sql}");
    let (inner, a, b) = binary(ast, left);
    assert_eq!(inner, op, "{sql}");
    assert_eq!(identifier(ast, a), "a", "{sql}");
    assert_eq!(identifier(ast, b), "b", "{sql}");
}

// ===================================================================
// Left associativity per level
// ===================================================================

#[test]
fn assoc_bit_xor() {
    assert_left_assoc("a ^ b ^ c", BinaryOp::BitwiseXor);
}

#[test]
fn assoc_multiplicative() {
    assert_left_assoc("a * b * c", BinaryOp::Multiply);
    assert_left_assoc("a / b / c", BinaryOp::Divide);
    assert_left_assoc("a % b % c", BinaryOp::Modulus);
    assert_left_assoc("a DIV b DIV c", BinaryOp::Div);
}

#[test]
fn assoc_additive() {
    assert_left_assoc("a + b + c", BinaryOp::Add);
    assert_left_assoc("a - b - c", BinaryOp::Subtract);
    assert_left_assoc("a || b || c", BinaryOp::Concat);
}

#[test]
fn assoc_shift() {
    assert_left_assoc("a << b << c", BinaryOp::LeftShift);
    assert_left_assoc("a >> b >> c", BinaryOp::RightShift);
}

#[test]
fn assoc_bit_and() {
    assert_left_assoc("a & b & c", BinaryOp::BitwiseAnd);
}

#[test]
fn assoc_bit_or() {
    assert_left_assoc("a | b | c", BinaryOp::BitwiseOr);
}

#[test]
fn assoc_relational() {
    assert_left_assoc("a = b = c", BinaryOp::Equality);
    assert_left_assoc("a < b < c", BinaryOp::LessThan);
    assert_left_assoc("a LIKE b LIKE c", BinaryOp::Like);
}

#[test]
fn assoc_and() {
    assert_left_assoc("a AND b AND c", BinaryOp::BooleanAnd);
    assert_left_assoc("a && b && c", BinaryOp::BooleanAnd);
}

#[test]
fn assoc_xor() {
    assert_left_assoc("a XOR b XOR c", BinaryOp::BooleanXor);
}

#[test]
fn assoc_or() {
    assert_left_assoc("a OR b OR c", BinaryOp::BooleanOr);
}

#[test]
fn assoc_mixed_operators_same_level() {
    let parsed = parse_expr("a - b + c");
    let (op, left, _) = binary(&parsed.ast, parsed.root);
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(
        parsed.ast.kind(left),
        NodeKind::Binary {
            op: BinaryOp::Subtract,
            ..
        }
    ));
}

// ===================================================================
// Binding strength
// ===================================================================

#[test]
fn prec_multiplicative_over_additive() {
    let parsed = parse_expr("a + b * c");
    let ast = &parsed.ast;
    let (op, left, right) = binary(ast, parsed.root);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(identifier(ast, left), "a");
    let (inner, b, c) = binary(ast, right);
    assert_eq!(inner, BinaryOp::Multiply);
    assert_eq!(identifier(ast, b), "b");
    assert_eq!(identifier(ast, c), "c");
}

#[test]
fn prec_comparison_over_and_over_or() {
    let parsed = parse_expr("a = 1 OR b = 2 AND c = 3");
    let ast = &parsed.ast;
    let (op, left, right) = binary(ast, parsed.root);
    assert_eq!(op, BinaryOp::BooleanOr);
    assert_eq!(binary(ast, left).0, BinaryOp::Equality);
    let (and, x, y) = binary(ast, right);
    assert_eq!(and, BinaryOp::BooleanAnd);
    assert_eq!(binary(ast, x).0, BinaryOp::Equality);
    assert_eq!(binary(ast, y).0, BinaryOp::Equality);
}

#[test]
fn prec_bitwise_between_arithmetic_and_comparison() {
    let parsed = parse_expr("a | b & c << 1 + 2 = d");
    let ast = &parsed.ast;
    let (eq, left, _) = binary(ast, parsed.root);
    assert_eq!(eq, BinaryOp::Equality);
    let (or, _, and) = binary(ast, left);
    assert_eq!(or, BinaryOp::BitwiseOr);
    let (and_op, _, shift) = binary(ast, and);
    assert_eq!(and_op, BinaryOp::BitwiseAnd);
    let (shift_op, _, sum) = binary(ast, shift);
    assert_eq!(shift_op, BinaryOp::LeftShift);
    assert_eq!(binary(ast, sum).0, BinaryOp::Add);
}

#[test]
fn prec_not_wraps_parenthesized_equality() {
    let parsed = parse_expr("NOT (1 = 1)");
    let ast = &parsed.ast;
    let NodeKind::Not { operand } = ast.kind(parsed.root) else {
        panic!("Expected NOT, got {:?}", ast.kind(parsed.root));
    };
    assert!(ast.is_parenthesized(*operand));
    let (op, left, right) = binary(ast, *operand);
    assert_eq!(op, BinaryOp::Equality);
    assert!(matches!(ast.kind(left), NodeKind::Integer(1)));
    assert!(matches!(ast.kind(right), NodeKind::Integer(1)));
    assert_eq!(ast.to_sql(parsed.root), "NOT (1 = 1)");
}

#[test]
fn prec_parentheses_override() {
    assert_eq!(expr_sql("(a + b) * c"), "(a + b) * c");
    assert_eq!(expr_sql("a - (b - c)"), "a - (b - c)");
}

// ===================================================================
// Grouped logical chains
// ===================================================================

#[test]
fn group_and_chain() {
    let parsed = parse_expr_with(
        "a AND b AND c AND d",
        generic(),
        Features::from(Feature::EnableBinaryOpGroup),
    );
    let NodeKind::BinaryGroup { op, items } = parsed.ast.kind(parsed.root) else {
        panic!("Expected group, got {:?}", parsed.ast.kind(parsed.root));
    };
    assert_eq!(*op, BinaryOp::BooleanAnd);
    assert_eq!(items.len(), 4);
    assert_eq!(parsed.ast.to_sql(parsed.root), "a AND b AND c AND d");
}

#[test]
fn group_two_operands_stay_binary() {
    let parsed = parse_expr_with(
        "a OR b",
        generic(),
        Features::from(Feature::EnableBinaryOpGroup),
    );
    assert_eq!(binary(&parsed.ast, parsed.root).0, BinaryOp::BooleanOr);
}

#[test]
fn group_chain_under_or() {
    let parsed = parse_expr_with(
        "a OR b AND c AND d OR e",
        generic(),
        Features::from(Feature::EnableBinaryOpGroup),
    );
    let ast = &parsed.ast;
    let NodeKind::BinaryGroup { op, items } = ast.kind(parsed.root) else {
        panic!("Expected group, got {:?}", ast.kind(parsed.root));
    };
    assert_eq!(*op, BinaryOp::BooleanOr);
    assert_eq!(items.len(), 3);
    assert!(matches!(
        ast.kind(items[1]),
        NodeKind::BinaryGroup {
            op: BinaryOp::BooleanAnd,
            ..
        }
    ));
}
