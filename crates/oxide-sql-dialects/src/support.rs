//! Hook building blocks shared by several dialects.

use oxide_sql_core::ast::{BinaryOp, NodeId, NodeKind};
use oxide_sql_core::dialect::{HookOutcome, HookResult};
use oxide_sql_core::lexer::TokenKind;
use oxide_sql_core::parser::ExprParser;

/// Consumes the operator token at the cursor and builds `left op right`,
/// with the right operand parsed at the `|` level.
pub fn infix(p: &mut ExprParser<'_>, left: NodeId, op: BinaryOp) -> HookResult<NodeId> {
    p.next_token();
    let right = p.bit_or()?;
    Ok(HookOutcome::Handled(p.binary(op, left, right)))
}

/// `expr::type`, repeated.
pub fn postfix_cast(p: &mut ExprParser<'_>, expr: NodeId) -> HookResult<NodeId> {
    if !p.is(&TokenKind::DoubleColon) {
        return Ok(HookOutcome::NotApplicable);
    }
    let start = p.span_start(expr);
    let mut expr = expr;
    while p.eat(&TokenKind::DoubleColon) {
        let data_type = p.data_type()?;
        expr = p.alloc(
            NodeKind::Cast {
                expr,
                data_type,
                try_cast: false,
                postfix: true,
            },
            start,
        );
    }
    Ok(HookOutcome::Handled(expr))
}
