//! Tests for speculative parsing, keyword hashing and arena operations.

mod common;
use common::*;

use std::collections::HashSet;

use oxide_sql_core::ast::NodeKind;
use oxide_sql_core::dialect::GENERIC_AGGREGATES;
use oxide_sql_core::feature::Features;
use oxide_sql_core::hash::{fnv1a_64_lower, names};
use oxide_sql_core::lexer::{Keyword, Lexer};
use oxide_sql_core::parser::ExprParser;

// ===================================================================
// Mark and reset
// ===================================================================

#[test]
fn cursor_reset_restores_everything() {
    let mut lexer = Lexer::new("SELECT a,\n  b FROM t");
    lexer.next_token();
    lexer.next_token();
    let mark = lexer.mark();
    let token = lexer.token().clone();
    for _ in 0..4 {
        lexer.next_token();
    }
    assert_ne!(lexer.mark(), mark);
    lexer.reset(mark.clone());
    assert_eq!(lexer.mark(), mark);
    assert_eq!(lexer.token(), &token);
    assert_eq!(lexer.token().line, 1);
    assert_eq!(lexer.token().column, 8);

    lexer.next_token();
    lexer.next_token();
    assert_eq!(lexer.token().line, 2);
    assert_eq!(lexer.token().column, 3);
}

#[test]
fn cursor_in_partition_is_not_membership() {
    let mut parser = ExprParser::new("t IN PARTITION (p1)", generic(), Features::empty());
    let t = parser.primary().unwrap();
    let before = parser.mark();
    assert_eq!(parser.in_rest(t).unwrap(), t);
    assert_eq!(parser.mark(), before);
    assert!(parser.is_keyword(Keyword::In));
}

#[test]
fn cursor_mod_without_operand_is_left_alone() {
    let mut parser = ExprParser::new("a MOD, b", generic(), Features::empty());
    let a = parser.primary().unwrap();
    let before = parser.mark();
    assert_eq!(parser.multiplicative_rest(a).unwrap(), a);
    assert_eq!(parser.mark(), before);
}

#[test]
fn cursor_interval_used_as_column_name() {
    let parsed = parse_stmt("SELECT interval FROM t");
    assert_eq!(parsed.ast.to_sql(parsed.statements[0]), "SELECT interval FROM t");
}

// ===================================================================
// Hash uniqueness
// ===================================================================

#[test]
fn hash_keywords_unique() {
    let hashes: HashSet<u64> = Keyword::ALL.iter().map(Keyword::hash_code_64).collect();
    assert_eq!(hashes.len(), Keyword::ALL.len());
}

#[test]
fn hash_keywords_case_folded() {
    for keyword in Keyword::ALL {
        let lower = keyword.as_str().to_ascii_lowercase();
        assert_eq!(fnv1a_64_lower(&lower), keyword.hash_code_64());
        assert_eq!(Keyword::from_str(&lower), Some(*keyword));
    }
}

#[test]
fn hash_names_do_not_shadow_keywords() {
    let hashes: HashSet<u64> = names::ALL.iter().map(|(_, h)| *h).collect();
    assert_eq!(hashes.len(), names::ALL.len());
    for (text, hash) in names::ALL {
        if let Some(keyword) = Keyword::from_hash(*hash) {
            assert!(keyword.as_str().eq_ignore_ascii_case(text), "{text}");
        }
    }
}

#[test]
fn hash_generic_aggregates_unique() {
    assert!(GENERIC_AGGREGATES.collisions().is_empty());
    assert!(GENERIC_AGGREGATES.contains_name("sum"));
    assert!(!GENERIC_AGGREGATES.contains_name("substr"));
}

// ===================================================================
// Arena
// ===================================================================

#[test]
fn arena_parent_links() {
    let parsed = parse_expr("f(a + 1, b)");
    let ast = &parsed.ast;
    for child in ast.children(parsed.root) {
        assert_eq!(ast.parent(child), Some(parsed.root));
        for grandchild in ast.children(child) {
            assert_eq!(ast.root_of(grandchild), parsed.root);
            assert_eq!(ast.ancestors(grandchild).count(), 2);
        }
    }
}

#[test]
fn arena_deep_clone_is_equal_and_detached() {
    let mut parsed = parse_expr("a + b * (c - 1)");
    let root = parsed.root;
    let copy = parsed.ast.deep_clone(root);
    assert_ne!(copy, root);
    assert_eq!(parsed.ast.parent(copy), None);
    assert!(parsed.ast.structural_eq(root, &parsed.ast, copy));
    assert_eq!(
        parsed.ast.structural_hash(root),
        parsed.ast.structural_hash(copy)
    );
    assert_eq!(parsed.ast.to_sql(copy), "a + b * (c - 1)");
    for (original, cloned) in parsed
        .ast
        .children(root)
        .into_iter()
        .zip(parsed.ast.children(copy))
    {
        assert_ne!(original, cloned);
        assert_eq!(parsed.ast.parent(cloned), Some(copy));
    }
}

#[test]
fn arena_structural_hash_ignores_spans_and_parens() {
    let one = parse_expr("a+b");
    let two = parse_expr("(  a   +   b )");
    assert_eq!(
        one.ast.structural_hash(one.root),
        two.ast.structural_hash(two.root)
    );
    let three = parse_expr("a - b");
    assert_ne!(
        one.ast.structural_hash(one.root),
        three.ast.structural_hash(three.root)
    );
}

#[test]
fn arena_update_invalidates_hash() {
    let mut parsed = parse_expr("a = 1");
    let root = parsed.root;
    let before = parsed.ast.structural_hash(root);
    let right = parsed.ast.children(root)[1];
    parsed
        .ast
        .update(right, |kind| *kind = NodeKind::Integer(2))
        .unwrap();
    assert_ne!(parsed.ast.structural_hash(root), before);
    assert_eq!(parsed.ast.to_sql(root), "a = 2");
}
