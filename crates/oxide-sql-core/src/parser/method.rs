//! Postfix operators, function calls, aggregates and window specs.

use super::primary::sequence_function;
use super::{ExprParser, Result};
use crate::ast::{
    BoundKind, FrameUnit, NodeId, NodeKind, NullTreatment, SetQuantifier, TrimOption,
};
use crate::hash::{fnv1a_64_lower, names};
use crate::lexer::{Keyword, TokenKind};

/// An aggregate call under construction.
///
/// [`Dialect::aggregate_args_rest`](crate::dialect::Dialect::aggregate_args_rest)
/// receives it after the arguments and `ORDER BY` have been parsed and may
/// fill in dialect clauses such as `SEPARATOR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    /// Function name as written.
    pub name: String,
    /// `DISTINCT` or `ALL`.
    pub quantifier: Option<SetQuantifier>,
    pub args: Vec<NodeId>,
    /// `ORDER BY` inside the argument list.
    pub order_by: Option<NodeId>,
    /// MySQL `GROUP_CONCAT(.. SEPARATOR s)`.
    pub separator: Option<NodeId>,
    pub limit: Option<NodeId>,
    pub nulls: Option<NullTreatment>,
}

impl AggregateCall {
    /// Creates a call with no arguments.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            quantifier: None,
            args: Vec::new(),
            order_by: None,
            separator: None,
            limit: None,
            nulls: None,
        }
    }
}

impl ExprParser<'_> {
    /// Applies postfix syntax to `expr`: the dialect hook, `.name`,
    /// `.*`, calls on a qualified name, `[index]` and `COLLATE`.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed postfix syntax.
    pub fn primary_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        loop {
            let hooks = self.hooks();
            let outcome = hooks.primary_rest(self, expr)?;
            if let Some(next) = self.resolve("primary_rest", outcome)? {
                expr = next;
                continue;
            }

            let start = self.span_start(expr);
            expr = match self.kind() {
                TokenKind::Dot => {
                    self.next_token();
                    self.dot_rest(expr, start)?
                }
                TokenKind::LeftBracket => {
                    self.next_token();
                    let index = self.expr()?;
                    self.accept(&TokenKind::RightBracket)?;
                    self.alloc(NodeKind::Index { expr, index }, start)
                }
                TokenKind::Identifier(_) if self.is_name(names::COLLATE) => {
                    self.next_token();
                    let collation = self.collation()?;
                    self.alloc(NodeKind::Collate { expr, collation }, start)
                }
                _ => return Ok(expr),
            };
        }
    }

    /// A collation name; string collations keep their quotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor is not on a name or string.
    pub fn collation(&mut self) -> Result<String> {
        if let TokenKind::String(value) = self.kind() {
            let quoted = format!("'{value}'");
            self.next_token();
            return Ok(quoted);
        }
        self.word()
    }

    /// What follows `owner.`
    fn dot_rest(&mut self, owner: NodeId, start: usize) -> Result<NodeId> {
        if self.eat(&TokenKind::Star) {
            return self.all_column_rest(Some(owner), start);
        }

        if let Some(hash @ (names::NEXTVAL | names::CURRVAL | names::PREVVAL)) =
            self.identifier_hash()
        {
            let mark = self.mark();
            self.next_token();
            if !self.is(&TokenKind::LeftParen) {
                let function = sequence_function(hash);
                return Ok(self.alloc(
                    NodeKind::Sequence {
                        name: owner,
                        function,
                    },
                    start,
                ));
            }
            self.reset(mark);
        }

        let name = self.word()?;
        if self.is(&TokenKind::LeftParen) {
            return self.method_rest(Some(owner), name, start);
        }
        Ok(self.alloc(NodeKind::Property { owner, name }, start))
    }

    /// `EXCEPT(..)` and `REPLACE(..)` after `*`, which has been consumed.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed column list.
    pub fn all_column_rest(&mut self, owner: Option<NodeId>, start: usize) -> Result<NodeId> {
        let except = if self.is_keyword(Keyword::Except) && self.column_list_follows() {
            self.next_token();
            self.paren_expr_list()?
        } else {
            Vec::new()
        };

        let mut replace = Vec::new();
        if self.is_keyword(Keyword::Replace) && self.column_list_follows() {
            self.next_token();
            self.accept(&TokenKind::LeftParen)?;
            loop {
                let item_start = self.start();
                let expr = self.expr()?;
                self.eat_keyword(Keyword::As);
                let alias = self.word()?;
                replace.push(self.alloc(
                    NodeKind::SelectItem {
                        expr,
                        alias: Some(alias),
                    },
                    item_start,
                ));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.accept(&TokenKind::RightParen)?;
        }

        Ok(self.alloc(
            NodeKind::AllColumn {
                owner,
                except,
                replace,
            },
            start,
        ))
    }

    /// True if the token after the current one is `(` that does not open a
    /// query, as in `* EXCEPT (a)` but not `.. EXCEPT (SELECT ..)`.
    fn column_list_follows(&mut self) -> bool {
        let mark = self.mark();
        self.next_token();
        let follows = self.eat(&TokenKind::LeftParen)
            && !matches!(
                self.kind(),
                TokenKind::Keyword(Keyword::Select | Keyword::With)
            );
        self.reset(mark);
        follows
    }

    /// Parses a call whose name has been consumed; the cursor is on `(`.
    ///
    /// Unqualified names go to the dialect hook first, then to the
    /// aggregate table.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed argument list.
    pub fn method_rest(
        &mut self,
        owner: Option<NodeId>,
        name: String,
        start: usize,
    ) -> Result<NodeId> {
        let hash = fnv1a_64_lower(&name);
        if owner.is_none() {
            let hooks = self.hooks();
            let outcome =
                hooks.method_rest_allow_identifier_method_specific(self, &name, hash, start)?;
            if let Some(expr) = self.resolve("method_rest_allow_identifier_method_specific", outcome)? {
                return Ok(expr);
            }
        }

        self.accept(&TokenKind::LeftParen)?;
        let aggregate = owner.is_none() && self.dialect().aggregate_functions().contains(hash);
        if aggregate || self.is_keyword(Keyword::Distinct) {
            return self.aggregate_body(AggregateCall::new(name), start);
        }

        let trim = if hash == names::TRIM {
            self.trim_option()
        } else {
            None
        };

        let mut args = Vec::new();
        let bare_trim = trim.is_some() && self.is_keyword(Keyword::From);
        if !self.is(&TokenKind::RightParen) && !bare_trim {
            args = self.expr_list()?;
        }

        if self.is_keyword(Keyword::Order) {
            let mut call = AggregateCall::new(name);
            call.args = args;
            return self.aggregate_finish(call, start);
        }

        let from = if self.eat_keyword(Keyword::From) {
            Some(self.expr()?)
        } else {
            None
        };
        let for_expr = if self.eat_keyword(Keyword::For) {
            Some(self.expr()?)
        } else {
            None
        };
        let using = if self.is_keyword(Keyword::Using) {
            let using_start = self.start();
            self.next_token();
            let charset = self.word()?;
            Some(self.alloc(NodeKind::Identifier(charset), using_start))
        } else {
            None
        };
        self.accept(&TokenKind::RightParen)?;
        let curried = self.curried_args()?;

        if owner.is_none() && self.aggregate_clause_follows() {
            let mut call = AggregateCall::new(name);
            call.args = args;
            return self.aggregate_tail(call, curried, start);
        }

        Ok(self.alloc(
            NodeKind::MethodInvoke {
                owner,
                name,
                args,
                curried,
                trim,
                from,
                for_expr,
                using,
            },
            start,
        ))
    }

    fn trim_option(&mut self) -> Option<TrimOption> {
        let option = match self.identifier_hash()? {
            names::LEADING => TrimOption::Leading,
            names::TRAILING => TrimOption::Trailing,
            names::BOTH => TrimOption::Both,
            _ => return None,
        };
        self.next_token();
        Some(option)
    }

    /// A second argument list directly after a call: `f(a)(b)`.
    fn curried_args(&mut self) -> Result<Option<Vec<NodeId>>> {
        if self.is(&TokenKind::LeftParen) {
            Ok(Some(self.paren_expr_list()?))
        } else {
            Ok(None)
        }
    }

    /// True if `OVER`, `FILTER (`, `WITHIN GROUP` or `IGNORE|RESPECT NULLS`
    /// follows a call, which makes it an aggregate.
    fn aggregate_clause_follows(&mut self) -> bool {
        if self.is_keyword(Keyword::Over) {
            return true;
        }
        let Some(
            hash @ (names::FILTER | names::WITHIN | names::IGNORE | names::RESPECT),
        ) = self.identifier_hash()
        else {
            return false;
        };
        let mark = self.mark();
        self.next_token();
        let follows = match hash {
            names::FILTER => self.is(&TokenKind::LeftParen),
            names::WITHIN => self.is_keyword(Keyword::Group),
            _ => self.is_name(names::NULLS),
        };
        self.reset(mark);
        follows
    }

    /// Aggregate arguments after `(`.
    fn aggregate_body(&mut self, mut call: AggregateCall, start: usize) -> Result<NodeId> {
        if self.eat_keyword(Keyword::Distinct) {
            call.quantifier = Some(SetQuantifier::Distinct);
        } else if self.is_keyword(Keyword::All) {
            let mark = self.mark();
            self.next_token();
            if self.is(&TokenKind::RightParen) || self.is(&TokenKind::Comma) {
                self.reset(mark);
            } else {
                call.quantifier = Some(SetQuantifier::All);
            }
        }

        if !self.is(&TokenKind::RightParen) {
            call.args = self.expr_list()?;
        }
        self.aggregate_finish(call, start)
    }

    /// In-parenthesis clauses after the arguments, then the closing `)`
    /// and what follows the call.
    fn aggregate_finish(&mut self, mut call: AggregateCall, start: usize) -> Result<NodeId> {
        if let Some(nulls) = self.null_treatment() {
            call.nulls = Some(nulls);
        }
        if self.is_keyword(Keyword::Order) {
            call.order_by = Some(self.order_by_clause()?);
        }

        let hooks = self.hooks();
        let outcome = hooks.aggregate_args_rest(self, &mut call)?;
        self.resolve("aggregate_args_rest", outcome)?;

        if self.eat_keyword(Keyword::Limit) {
            call.limit = Some(self.expr()?);
        }
        self.accept(&TokenKind::RightParen)?;
        let curried = self.curried_args()?;
        self.aggregate_tail(call, curried, start)
    }

    /// `IGNORE NULLS` or `RESPECT NULLS`.
    fn null_treatment(&mut self) -> Option<NullTreatment> {
        let treatment = match self.identifier_hash()? {
            names::IGNORE => NullTreatment::Ignore,
            names::RESPECT => NullTreatment::Respect,
            _ => return None,
        };
        let mark = self.mark();
        self.next_token();
        if self.eat_name(names::NULLS) {
            Some(treatment)
        } else {
            self.reset(mark);
            None
        }
    }

    /// `NULLS`, `WITHIN GROUP`, `FILTER` and `OVER` after an aggregate's
    /// closing parenthesis.
    fn aggregate_tail(
        &mut self,
        mut call: AggregateCall,
        curried: Option<Vec<NodeId>>,
        start: usize,
    ) -> Result<NodeId> {
        if call.nulls.is_none() {
            call.nulls = self.null_treatment();
        }

        let within_group = if self.is_name(names::WITHIN) {
            self.next_token();
            self.accept_keyword(Keyword::Group)?;
            self.accept(&TokenKind::LeftParen)?;
            let order = self.order_by_clause()?;
            self.accept(&TokenKind::RightParen)?;
            Some(order)
        } else {
            None
        };

        let filter = if self.is_name(names::FILTER) && self.aggregate_clause_follows() {
            self.next_token();
            self.accept(&TokenKind::LeftParen)?;
            self.accept_keyword(Keyword::Where)?;
            let condition = self.expr()?;
            self.accept(&TokenKind::RightParen)?;
            Some(condition)
        } else {
            None
        };

        let over = if self.is_keyword(Keyword::Over) {
            Some(self.over()?)
        } else {
            None
        };

        let AggregateCall {
            name,
            quantifier,
            args,
            order_by,
            separator,
            limit,
            nulls,
        } = call;
        Ok(self.alloc(
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
            },
            start,
        ))
    }

    /// `OVER name` or `OVER ([PARTITION BY ..] [ORDER BY ..] [frame])`.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed window specification.
    pub fn over(&mut self) -> Result<NodeId> {
        let start = self.start();
        self.accept_keyword(Keyword::Over)?;
        if !self.is(&TokenKind::LeftParen) {
            let name = self.word()?;
            return Ok(self.alloc(
                NodeKind::Over {
                    name: Some(name),
                    partition_by: Vec::new(),
                    order_by: None,
                    frame: None,
                },
                start,
            ));
        }

        self.next_token();
        let partition_by = if self.eat_keyword(Keyword::Partition) {
            self.accept_keyword(Keyword::By)?;
            self.expr_list()?
        } else {
            Vec::new()
        };
        let order_by = if self.is_keyword(Keyword::Order) {
            Some(self.order_by_clause()?)
        } else {
            None
        };
        let frame = self.window_frame()?;
        self.accept(&TokenKind::RightParen)?;
        Ok(self.alloc(
            NodeKind::Over {
                name: None,
                partition_by,
                order_by,
                frame,
            },
            start,
        ))
    }

    fn window_frame(&mut self) -> Result<Option<NodeId>> {
        let unit = match self.identifier_hash() {
            Some(names::ROWS) => FrameUnit::Rows,
            Some(names::RANGE) => FrameUnit::Range,
            _ => return Ok(None),
        };
        let start = self.start();
        self.next_token();
        let (first, end) = if self.eat_keyword(Keyword::Between) {
            let first = self.frame_bound()?;
            self.accept_keyword(Keyword::And)?;
            (first, Some(self.frame_bound()?))
        } else {
            (self.frame_bound()?, None)
        };
        Ok(Some(self.alloc(
            NodeKind::WindowFrame {
                unit,
                start: first,
                end,
            },
            start,
        )))
    }

    fn frame_bound(&mut self) -> Result<NodeId> {
        let start = self.start();
        if self.eat_name(names::UNBOUNDED) {
            let bound = if self.eat_name(names::PRECEDING) {
                BoundKind::UnboundedPreceding
            } else {
                self.accept_name(names::FOLLOWING, "FOLLOWING")?;
                BoundKind::UnboundedFollowing
            };
            return Ok(self.alloc(NodeKind::FrameBound { bound, offset: None }, start));
        }
        if self.eat_name(names::CURRENT) {
            self.accept_keyword(Keyword::Row)?;
            return Ok(self.alloc(
                NodeKind::FrameBound {
                    bound: BoundKind::CurrentRow,
                    offset: None,
                },
                start,
            ));
        }

        let offset = self.additive()?;
        let bound = if self.eat_name(names::PRECEDING) {
            BoundKind::Preceding
        } else {
            self.accept_name(names::FOLLOWING, "FOLLOWING")?;
            BoundKind::Following
        };
        Ok(self.alloc(
            NodeKind::FrameBound {
                bound,
                offset: Some(offset),
            },
            start,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dialect::GenericDialect;
    use crate::feature::Features;
    use crate::parser::{ParsedExpr, parse_expression};

    fn parse(sql: &str) -> ParsedExpr {
        parse_expression(sql, Arc::new(GenericDialect::default()), Features::empty()).unwrap()
    }

    fn sql(text: &str) -> String {
        let parsed = parse(text);
        parsed.ast.to_sql(parsed.root)
    }

    #[test]
    fn test_curried_call() {
        let parsed = parse("f(x, y)(a, b)");
        let NodeKind::MethodInvoke { args, curried, .. } = parsed.ast.kind(parsed.root) else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 2);
        assert_eq!(curried.as_ref().map(Vec::len), Some(2));
        assert_eq!(parsed.ast.to_sql(parsed.root), "f(x, y)(a, b)");
    }

    #[test]
    fn test_aggregate_from_table() {
        let parsed = parse("count(DISTINCT a)");
        assert!(matches!(
            parsed.ast.kind(parsed.root),
            NodeKind::Aggregate {
                quantifier: Some(SetQuantifier::Distinct),
                ..
            }
        ));

        let parsed = parse("COUNT(*)");
        let NodeKind::Aggregate { args, .. } = parsed.ast.kind(parsed.root) else {
            panic!("expected aggregate");
        };
        assert!(matches!(parsed.ast.kind(args[0]), NodeKind::AllColumn { .. }));
    }

    #[test]
    fn test_plain_call_becomes_aggregate_with_window() {
        let parsed = parse("row_number() OVER (PARTITION BY a ORDER BY b DESC)");
        assert!(matches!(
            parsed.ast.kind(parsed.root),
            NodeKind::Aggregate { over: Some(_), .. }
        ));
        assert_eq!(
            parsed.ast.to_sql(parsed.root),
            "row_number() OVER (PARTITION BY a ORDER BY b DESC)"
        );
    }

    #[test]
    fn test_window_frames() {
        assert_eq!(
            sql("sum(x) over (order by t rows between unbounded preceding and current row)"),
            "sum(x) OVER (ORDER BY t ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"
        );
        assert_eq!(
            sql("SUM(x) OVER (ROWS 3 PRECEDING)"),
            "SUM(x) OVER (ROWS 3 PRECEDING)"
        );
        assert_eq!(sql("SUM(x) OVER w"), "SUM(x) OVER w");
    }

    #[test]
    fn test_aggregate_clauses() {
        assert_eq!(
            sql("percentile_cont(0.5) WITHIN GROUP (ORDER BY x)"),
            "percentile_cont(0.5) WITHIN GROUP (ORDER BY x)"
        );
        assert_eq!(
            sql("count(*) filter (where a > 1)"),
            "count(*) FILTER (WHERE a > 1)"
        );
        assert_eq!(
            sql("string_agg(a, ',' ORDER BY a)"),
            "string_agg(a, ',' ORDER BY a)"
        );
        assert_eq!(
            sql("first_value(x) IGNORE NULLS OVER (ORDER BY t)"),
            "first_value(x) IGNORE NULLS OVER (ORDER BY t)"
        );
    }

    #[test]
    fn test_call_clauses() {
        assert_eq!(sql("EXTRACT(YEAR FROM d)"), "EXTRACT(YEAR FROM d)");
        assert_eq!(
            sql("substring(s FROM 1 FOR 2)"),
            "substring(s FROM 1 FOR 2)"
        );
        assert_eq!(sql("trim(BOTH 'x' FROM s)"), "trim(BOTH 'x' FROM s)");
        assert_eq!(sql("TRIM(LEADING FROM s)"), "TRIM(LEADING FROM s)");
        assert_eq!(sql("convert(s USING utf8)"), "convert(s USING utf8)");
    }

    #[test]
    fn test_property_and_method_on_owner() {
        let parsed = parse("a.b.c");
        let NodeKind::Property { owner, name } = parsed.ast.kind(parsed.root) else {
            panic!("expected property");
        };
        assert_eq!(name, "c");
        assert!(matches!(parsed.ast.kind(*owner), NodeKind::Property { .. }));

        let parsed = parse("s.f(1)");
        assert!(matches!(
            parsed.ast.kind(parsed.root),
            NodeKind::MethodInvoke { owner: Some(_), .. }
        ));

        let parsed = parse("s.seq.NEXTVAL");
        assert!(matches!(parsed.ast.kind(parsed.root), NodeKind::Sequence { .. }));
    }

    #[test]
    fn test_all_columns_with_except_replace() {
        assert_eq!(sql("t.*"), "t.*");
        assert_eq!(
            sql("* EXCEPT (a, b) REPLACE (a + 1 AS a)"),
            "* EXCEPT(a, b) REPLACE(a + 1 AS a)"
        );
    }

    #[test]
    fn test_index_and_collate() {
        assert_eq!(sql("a[1][2]"), "a[1][2]");
        assert_eq!(sql("name COLLATE utf8_bin"), "name COLLATE utf8_bin");
    }
}
