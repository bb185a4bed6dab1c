//! SELECT queries and FROM clauses.

use super::{ExprParser, Result};
use crate::ast::{
    JoinType, NodeId, NodeKind, NullsOrder, SetOperator, SetQuantifier, SortDirection,
};
use crate::feature::Feature;
use crate::hash::{fnv1a_64_lower, names};
use crate::lexer::{Keyword, TokenKind};

impl ExprParser<'_> {
    /// Parses `[WITH ..] body [ORDER BY ..] [LIMIT ..]`.
    ///
    /// # Errors
    ///
    /// Returns an error if no query starts at the cursor.
    pub fn query(&mut self) -> Result<NodeId> {
        let start = self.start();
        let with = if self.is_keyword(Keyword::With) {
            Some(self.with_clause()?)
        } else {
            None
        };

        let mut body = self.query_primary()?;
        while let Some(op) = self.set_operator() {
            let right = self.query_primary()?;
            let left_start = self.span_start(body);
            body = self.alloc(
                NodeKind::SetOperation {
                    op,
                    left: body,
                    right,
                },
                left_start,
            );
        }

        let order_by = if self.is_keyword(Keyword::Order) {
            Some(self.order_by_clause()?)
        } else {
            None
        };
        let limit = self.limit_clause()?;
        Ok(self.alloc(
            NodeKind::Query {
                with,
                body,
                order_by,
                limit,
            },
            start,
        ))
    }

    fn set_operator(&mut self) -> Option<SetOperator> {
        let op = match self.kind() {
            TokenKind::Keyword(Keyword::Union) => {
                self.next_token();
                if self.eat_keyword(Keyword::All) {
                    SetOperator::UnionAll
                } else if self.eat_keyword(Keyword::Distinct) {
                    SetOperator::UnionDistinct
                } else {
                    SetOperator::Union
                }
            }
            TokenKind::Keyword(Keyword::Except) => {
                self.next_token();
                SetOperator::Except
            }
            TokenKind::Keyword(Keyword::Intersect) => {
                self.next_token();
                SetOperator::Intersect
            }
            TokenKind::Keyword(Keyword::Minus) => {
                self.next_token();
                SetOperator::Minus
            }
            _ => return None,
        };
        Some(op)
    }

    fn query_primary(&mut self) -> Result<NodeId> {
        if self.eat(&TokenKind::LeftParen) {
            let query = self.query()?;
            self.accept(&TokenKind::RightParen)?;
            self.ast_mut().set_parenthesized(query, true);
            return Ok(query);
        }
        if !self.is_keyword(Keyword::Select) {
            return Err(self.unexpected("SELECT"));
        }
        self.query_block()
    }

    /// `WITH [RECURSIVE] name [(cols)] AS (query), ..`
    fn with_clause(&mut self) -> Result<NodeId> {
        let start = self.start();
        self.accept_keyword(Keyword::With)?;
        let recursive = self.eat_name(names::RECURSIVE);
        let mut entries = Vec::new();
        loop {
            let entry_start = self.start();
            let name = self.word()?;
            let mut columns = Vec::new();
            if self.eat(&TokenKind::LeftParen) {
                loop {
                    columns.push(self.word()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.accept(&TokenKind::RightParen)?;
            }
            self.accept_keyword(Keyword::As)?;
            self.accept(&TokenKind::LeftParen)?;
            let query = self.query()?;
            self.accept(&TokenKind::RightParen)?;
            entries.push(self.alloc(
                NodeKind::WithEntry {
                    name,
                    columns,
                    query,
                },
                entry_start,
            ));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.alloc(NodeKind::With { recursive, entries }, start))
    }

    /// `SELECT [DISTINCT|ALL] items [FROM ..] [WHERE ..] [GROUP BY ..]
    /// [HAVING ..]`
    fn query_block(&mut self) -> Result<NodeId> {
        let start = self.start();
        self.accept_keyword(Keyword::Select)?;
        let quantifier = if self.eat_keyword(Keyword::Distinct) {
            Some(SetQuantifier::Distinct)
        } else if self.eat_keyword(Keyword::All) {
            Some(SetQuantifier::All)
        } else {
            None
        };

        let mut items = Vec::new();
        loop {
            items.push(self.select_item()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let from = if self.eat_keyword(Keyword::From) {
            Some(self.table_source()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.expr()?)
        } else {
            None
        };
        let group_by = if self.is_keyword(Keyword::Group) {
            Some(self.group_by_clause()?)
        } else {
            None
        };
        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.expr()?)
        } else {
            None
        };

        Ok(self.alloc(
            NodeKind::QueryBlock {
                quantifier,
                items,
                from,
                where_clause,
                group_by,
                having,
            },
            start,
        ))
    }

    fn select_item(&mut self) -> Result<NodeId> {
        let start = self.start();
        let expr = self.expr()?;
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.alias_name()?)
        } else if matches!(self.ast().kind(expr), NodeKind::AllColumn { .. }) {
            None
        } else {
            match self.kind() {
                TokenKind::Identifier(_) | TokenKind::String(_) => Some(self.alias_name()?),
                _ => None,
            }
        };

        let alias = match alias {
            None if self.is_enabled(Feature::SelectItemGenerateAlias) => {
                self.generated_alias(expr)
            }
            alias => alias,
        };
        Ok(self.alloc(NodeKind::SelectItem { expr, alias }, start))
    }

    /// An alias word; string aliases keep their quotes.
    fn alias_name(&mut self) -> Result<String> {
        if let TokenKind::String(value) = self.kind() {
            let quoted = format!("'{value}'");
            self.next_token();
            return Ok(quoted);
        }
        self.word()
    }

    /// The source text of `expr`, quoted as an identifier, for items that
    /// are not plain column references.
    fn generated_alias(&self, expr: NodeId) -> Option<String> {
        if matches!(
            self.ast().kind(expr),
            NodeKind::Identifier(_) | NodeKind::Property { .. } | NodeKind::AllColumn { .. }
        ) {
            return None;
        }
        let text = self.ast().span(expr).slice(self.lexer().input())?;
        let quote = if self.lexer().config().backtick_identifiers {
            '`'
        } else {
            '"'
        };
        let escaped = text.replace(quote, &format!("{quote}{quote}"));
        Some(format!("{quote}{escaped}{quote}"))
    }

    fn group_by_clause(&mut self) -> Result<NodeId> {
        let start = self.start();
        self.accept_keyword(Keyword::Group)?;
        self.accept_keyword(Keyword::By)?;
        let items = self.expr_list()?;
        let mut rollup = false;
        if self.is_keyword(Keyword::With) {
            let mark = self.mark();
            self.next_token();
            rollup = self.eat_name(names::ROLLUP);
            if !rollup {
                self.reset(mark);
            }
        }
        Ok(self.alloc(NodeKind::GroupBy { items, rollup }, start))
    }

    /// `ORDER BY expr [ASC|DESC] [NULLS FIRST|LAST], ..`
    ///
    /// # Errors
    ///
    /// Returns an error if the clause is malformed.
    pub fn order_by_clause(&mut self) -> Result<NodeId> {
        let start = self.start();
        self.accept_keyword(Keyword::Order)?;
        self.accept_keyword(Keyword::By)?;
        let mut items = Vec::new();
        loop {
            let item_start = self.start();
            let expr = self.expr()?;
            let direction = if self.eat_keyword(Keyword::Asc) {
                Some(SortDirection::Asc)
            } else if self.eat_keyword(Keyword::Desc) {
                Some(SortDirection::Desc)
            } else {
                None
            };
            let nulls = self.nulls_order()?;
            items.push(self.alloc(
                NodeKind::OrderItem {
                    expr,
                    direction,
                    nulls,
                },
                item_start,
            ));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.alloc(NodeKind::OrderBy { items }, start))
    }

    fn nulls_order(&mut self) -> Result<Option<NullsOrder>> {
        if !self.eat_name(names::NULLS) {
            return Ok(None);
        }
        if self.eat_name(names::FIRST) {
            Ok(Some(NullsOrder::First))
        } else {
            self.accept_name(names::LAST, "LAST")?;
            Ok(Some(NullsOrder::Last))
        }
    }

    /// `LIMIT n [OFFSET m]` or `LIMIT m, n`.
    fn limit_clause(&mut self) -> Result<Option<NodeId>> {
        let start = self.start();
        if !self.eat_keyword(Keyword::Limit) {
            return Ok(None);
        }
        let first = self.expr()?;
        let (count, offset) = if self.eat(&TokenKind::Comma) {
            (self.expr()?, Some(first))
        } else if self.eat_keyword(Keyword::Offset) {
            (first, Some(self.expr()?))
        } else {
            (first, None)
        };
        Ok(Some(self.alloc(NodeKind::Limit { count, offset }, start)))
    }

    // ---- table sources -------------------------------------------------

    /// Parses a `FROM` item with its joins.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed table source or join.
    pub fn table_source(&mut self) -> Result<NodeId> {
        let start = self.start();
        let mut left = self.table_primary()?;
        loop {
            let (join_type, natural) = if self.eat(&TokenKind::Comma) {
                (JoinType::Comma, false)
            } else if let Some(join) = self.join_type()? {
                join
            } else {
                return Ok(left);
            };

            let right = self.table_primary()?;
            let mut condition = None;
            let mut using = Vec::new();
            if join_type != JoinType::Comma {
                if self.eat_keyword(Keyword::On) {
                    condition = Some(self.expr()?);
                } else if self.eat_keyword(Keyword::Using) {
                    using = self.paren_expr_list()?;
                }
            }
            left = self.alloc(
                NodeKind::JoinTableSource {
                    left,
                    right,
                    join_type,
                    natural,
                    condition,
                    using,
                },
                start,
            );
        }
    }

    /// `[NATURAL] [INNER|LEFT|RIGHT|FULL [OUTER]|CROSS] JOIN`
    fn join_type(&mut self) -> Result<Option<(JoinType, bool)>> {
        let natural = self.eat_name(names::NATURAL);
        let join_type = match self.kind() {
            TokenKind::Keyword(Keyword::Join) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Inner) => {
                self.next_token();
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Left) => {
                self.next_token();
                self.eat_keyword(Keyword::Outer);
                JoinType::Left
            }
            TokenKind::Keyword(Keyword::Right) => {
                self.next_token();
                self.eat_keyword(Keyword::Outer);
                JoinType::Right
            }
            TokenKind::Keyword(Keyword::Full) => {
                self.next_token();
                self.eat_keyword(Keyword::Outer);
                JoinType::Full
            }
            TokenKind::Identifier(_) if self.is_name(names::CROSS) => {
                self.next_token();
                JoinType::Cross
            }
            _ if natural => return Err(self.unexpected("JOIN")),
            _ => return Ok(None),
        };
        self.accept_keyword(Keyword::Join)?;
        Ok(Some((join_type, natural)))
    }

    /// One table, subquery or parenthesised join, with its alias and any
    /// dialect suffix such as `LATERAL VIEW`.
    fn table_primary(&mut self) -> Result<NodeId> {
        let start = self.start();
        let mut source = if self.eat(&TokenKind::LeftParen) {
            if matches!(
                self.kind(),
                TokenKind::Keyword(Keyword::Select | Keyword::With)
            ) {
                let query = self.query()?;
                self.accept(&TokenKind::RightParen)?;
                let alias = self.table_alias(false)?;
                self.alloc(NodeKind::SubqueryTableSource { query, alias }, start)
            } else {
                let inner = self.table_source()?;
                self.accept(&TokenKind::RightParen)?;
                self.ast_mut().set_parenthesized(inner, true);
                inner
            }
        } else {
            let expr = self.primary()?;
            let alias = self.table_alias(false)?;
            self.alloc(NodeKind::ExprTableSource { expr, alias }, start)
        };

        let hooks = self.hooks();
        loop {
            let outcome = hooks.parse_table_source_rest(self, source)?;
            match self.resolve("parse_table_source_rest", outcome)? {
                Some(next) => source = next,
                None => return Ok(source),
            }
        }
    }

    /// Parses an optional table alias.
    ///
    /// Join words, `NATURAL` and `CROSS` are never aliases. `DISTRIBUTE`,
    /// `CLUSTER` and `SORT` are aliases unless `BY` follows, `LATERAL`
    /// unless `VIEW` follows, and `PARTITION` only with
    /// [`Feature::TableAliasPartition`]. With `must`, a missing alias is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `AS` is not followed by a name, or `must` is
    /// set and no alias is present.
    pub fn table_alias(&mut self, must: bool) -> Result<Option<String>> {
        if self.eat_keyword(Keyword::As) {
            return self.alias_name().map(Some);
        }

        let alias = match self.kind() {
            TokenKind::Identifier(raw) => {
                let hash = fnv1a_64_lower(raw);
                let raw = raw.clone();
                match hash {
                    names::NATURAL | names::CROSS => None,
                    names::DISTRIBUTE | names::CLUSTER | names::SORT => {
                        self.word_unless_followed_by(&TokenKind::Keyword(Keyword::By), raw)
                    }
                    names::LATERAL => {
                        self.word_unless_followed_by(&TokenKind::Keyword(Keyword::View), raw)
                    }
                    _ => {
                        self.next_token();
                        Some(self.name_text(raw))
                    }
                }
            }
            TokenKind::Keyword(Keyword::Partition)
                if self.is_enabled(Feature::TableAliasPartition) =>
            {
                let text = self.token_text();
                self.next_token();
                Some(text)
            }
            _ => None,
        };

        if alias.is_none() && must {
            return Err(self.unexpected("alias"));
        }
        Ok(alias)
    }

    /// Consumes the current word as an alias unless `next` follows it.
    fn word_unless_followed_by(&mut self, next: &TokenKind, raw: String) -> Option<String> {
        let mark = self.mark();
        self.next_token();
        if self.is(next) {
            self.reset(mark);
            None
        } else {
            Some(self.name_text(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dialect::GenericDialect;
    use crate::feature::Features;

    fn query(sql: &str) -> String {
        query_with(sql, Features::empty())
    }

    fn query_with(sql: &str, features: Features) -> String {
        let mut parser = ExprParser::new(sql, Arc::new(GenericDialect::default()), features);
        let id = parser.query().unwrap();
        parser.expect_eof().unwrap();
        parser.ast().to_sql(id)
    }

    fn alias_of(sql: &str, features: Features) -> Option<String> {
        let mut parser = ExprParser::new(sql, Arc::new(GenericDialect::default()), features);
        parser.primary().unwrap();
        parser.table_alias(false).unwrap()
    }

    #[test]
    fn test_select_clauses() {
        assert_eq!(
            query("select distinct a, b x, c as y from t where a > 1 group by a, b having count(*) > 2 order by a desc nulls last limit 10 offset 5"),
            "SELECT DISTINCT a, b AS x, c AS y FROM t WHERE a > 1 GROUP BY a, b HAVING count(*) > 2 ORDER BY a DESC NULLS LAST LIMIT 10 OFFSET 5"
        );
    }

    #[test]
    fn test_limit_comma_form() {
        assert_eq!(query("SELECT a FROM t LIMIT 5, 10"), "SELECT a FROM t LIMIT 10 OFFSET 5");
    }

    #[test]
    fn test_joins() {
        assert_eq!(
            query("SELECT * FROM a JOIN b ON a.id = b.id LEFT OUTER JOIN c USING (id), d"),
            "SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c USING (id), d"
        );
        assert_eq!(
            query("SELECT * FROM a NATURAL JOIN b CROSS JOIN c"),
            "SELECT * FROM a NATURAL JOIN b CROSS JOIN c"
        );
    }

    #[test]
    fn test_subquery_source_and_set_operations() {
        assert_eq!(
            query("SELECT x FROM (SELECT 1 AS x) s UNION ALL SELECT 2 EXCEPT SELECT 3"),
            "SELECT x FROM (SELECT 1 AS x) s UNION ALL SELECT 2 EXCEPT SELECT 3"
        );
        assert_eq!(
            query("(SELECT 1) UNION (SELECT 2) ORDER BY 1"),
            "(SELECT 1) UNION (SELECT 2) ORDER BY 1"
        );
    }

    #[test]
    fn test_with_clause() {
        assert_eq!(
            query("WITH RECURSIVE r (n) AS (SELECT 1) SELECT n FROM r"),
            "WITH RECURSIVE r (n) AS (SELECT 1) SELECT n FROM r"
        );
    }

    #[test]
    fn test_group_by_rollup() {
        assert_eq!(
            query("SELECT a FROM t GROUP BY a WITH ROLLUP"),
            "SELECT a FROM t GROUP BY a WITH ROLLUP"
        );
    }

    #[test]
    fn test_all_column_takes_no_bare_alias() {
        let mut parser = ExprParser::new(
            "SELECT * x",
            Arc::new(GenericDialect::default()),
            Features::empty(),
        );
        parser.query().unwrap();
        assert!(parser.expect_eof().is_err());
    }

    #[test]
    fn test_generated_alias() {
        assert_eq!(
            query_with(
                "SELECT a, a + 1 FROM t",
                Features::of(&[Feature::SelectItemGenerateAlias])
            ),
            "SELECT a, a + 1 AS \"a + 1\" FROM t"
        );
    }

    #[test]
    fn test_table_alias_rules() {
        assert_eq!(alias_of("t x", Features::empty()), Some(String::from("x")));
        assert_eq!(alias_of("t AS x", Features::empty()), Some(String::from("x")));
        assert_eq!(alias_of("t LEFT JOIN u", Features::empty()), None);
        assert_eq!(alias_of("t NATURAL JOIN u", Features::empty()), None);
        assert_eq!(alias_of("t CROSS JOIN u", Features::empty()), None);
        assert_eq!(alias_of("t distribute by a", Features::empty()), None);
        assert_eq!(
            alias_of("t distribute", Features::empty()),
            Some(String::from("distribute"))
        );
        assert_eq!(alias_of("t sort by a", Features::empty()), None);
        assert_eq!(alias_of("t partition", Features::empty()), None);
        assert_eq!(
            alias_of("t partition", Features::of(&[Feature::TableAliasPartition])),
            Some(String::from("partition"))
        );
    }

    #[test]
    fn test_alias_by_backtracking_keeps_cursor() {
        let mut parser = ExprParser::new(
            "t cluster by a",
            Arc::new(GenericDialect::default()),
            Features::empty(),
        );
        parser.primary().unwrap();
        let before = parser.mark();
        assert_eq!(parser.table_alias(false).unwrap(), None);
        assert_eq!(parser.mark(), before);
    }

    #[test]
    fn test_must_alias() {
        let mut parser = ExprParser::new(
            "t WHERE",
            Arc::new(GenericDialect::default()),
            Features::empty(),
        );
        parser.primary().unwrap();
        assert!(parser.table_alias(true).is_err());
    }
}
