//! MySQL and its derivatives (MariaDB, TiDB, OceanBase, ...).
//!
//! # How MySQL differs from the generic grammar
//!
//! - `` `name` `` quotes identifiers and `"..."` is a string.
//! - Strings decode backslash escapes; `#` starts a line comment.
//! - `||` is a logical `OR` unless [`Feature::PipesAsConcat`] is enabled.
//! - `BINARY x`, `_charset 'text'` and `MATCH (..) AGAINST (..)`.
//! - `GROUP_CONCAT(.. SEPARATOR s)` and `CONVERT(x, type)`.
//! - `INTERVAL` always takes a unit: `INTERVAL 1 DAY`.

use std::sync::LazyLock;

use oxide_sql_core::ast::{BinaryOp, NodeId, NodeKind, StringStyle, UnaryOp};
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::dialect::{AggregateTable, Dialect, HookOutcome, HookResult};
use oxide_sql_core::feature::{Feature, Features};
use oxide_sql_core::hash::{fnv1a_64_lower, names};
use oxide_sql_core::lexer::{Keyword, LexerConfig, TokenKind};
use oxide_sql_core::parser::{AggregateCall, ExprParser, Result};

const CONVERT: u64 = fnv1a_64_lower("convert");
const GROUP_CONCAT: u64 = fnv1a_64_lower("group_concat");

/// MySQL aggregate functions.
pub static MYSQL_AGGREGATES: LazyLock<AggregateTable> = LazyLock::new(|| {
    AggregateTable::new(&[
        "AVG",
        "BIT_AND",
        "BIT_OR",
        "BIT_XOR",
        "COUNT",
        "GROUP_CONCAT",
        "JSON_ARRAYAGG",
        "JSON_OBJECTAGG",
        "MAX",
        "MIN",
        "STD",
        "STDDEV",
        "STDDEV_POP",
        "STDDEV_SAMP",
        "SUM",
        "VAR_POP",
        "VAR_SAMP",
        "VARIANCE",
    ])
});

/// Lexical rules of the MySQL family.
pub const MYSQL_LEXER: LexerConfig = LexerConfig {
    backslash_escapes: true,
    double_quoted_strings: true,
    backtick_identifiers: true,
    hash_comments: true,
    ..LexerConfig::ANSI
};

/// The MySQL dialect, parameterised by the family member it parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MySqlDialect {
    db_type: DbType,
}

impl MySqlDialect {
    /// Creates a MySQL-family dialect for `db_type`.
    #[must_use]
    pub const fn new(db_type: DbType) -> Self {
        Self { db_type }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new(DbType::MySql)
    }
}

/// Starts an operand of `BINARY`: anything but a delimiter or clause
/// keyword.
fn starts_operand(kind: &TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::Comma
            | TokenKind::RightParen
            | TokenKind::Semicolon
            | TokenKind::Eof
            | TokenKind::Dot
            | TokenKind::Eq
            | TokenKind::Keyword(
                Keyword::From
                    | Keyword::As
                    | Keyword::Where
                    | Keyword::And
                    | Keyword::Or
                    | Keyword::Then
                    | Keyword::End
                    | Keyword::Order
                    | Keyword::Group
            )
    )
}

impl MySqlDialect {
    /// `MATCH (col, ..) AGAINST (expr [modifier])`, after `MATCH`.
    fn match_against(p: &mut ExprParser<'_>, start: usize) -> HookResult<NodeId> {
        let mark = p.mark();
        if !p.eat(&TokenKind::LeftParen) {
            return Ok(HookOutcome::NotApplicable);
        }
        let columns = p.expr_list()?;
        p.accept(&TokenKind::RightParen)?;
        if !p.eat_name(names::AGAINST) {
            p.reset(mark);
            return Ok(HookOutcome::NotApplicable);
        }
        p.accept(&TokenKind::LeftParen)?;
        let against = p.primary()?;
        let modifier = Self::search_modifier(p)?;
        p.accept(&TokenKind::RightParen)?;
        Ok(HookOutcome::Handled(p.alloc(
            NodeKind::MatchAgainst {
                columns,
                against,
                modifier,
            },
            start,
        )))
    }

    fn search_modifier(p: &mut ExprParser<'_>) -> Result<Option<String>> {
        if p.eat_keyword(Keyword::In) {
            let modifier = if p.eat_name(names::BOOLEAN) {
                p.accept_name(names::MODE, "MODE")?;
                String::from("IN BOOLEAN MODE")
            } else {
                p.accept_name(names::NATURAL, "NATURAL")?;
                p.accept_name(names::LANGUAGE, "LANGUAGE")?;
                p.accept_name(names::MODE, "MODE")?;
                if p.is_keyword(Keyword::With) {
                    p.next_token();
                    p.accept_name(names::QUERY, "QUERY")?;
                    p.accept_name(names::EXPANSION, "EXPANSION")?;
                    String::from("IN NATURAL LANGUAGE MODE WITH QUERY EXPANSION")
                } else {
                    String::from("IN NATURAL LANGUAGE MODE")
                }
            };
            return Ok(Some(modifier));
        }
        if p.eat_keyword(Keyword::With) {
            p.accept_name(names::QUERY, "QUERY")?;
            p.accept_name(names::EXPANSION, "EXPANSION")?;
            return Ok(Some(String::from("WITH QUERY EXPANSION")));
        }
        Ok(None)
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        self.db_type.name()
    }

    fn db_type(&self) -> DbType {
        self.db_type
    }

    fn lexer_config(&self) -> LexerConfig {
        MYSQL_LEXER
    }

    fn default_features(&self) -> Features {
        Features::of(&[Feature::DateLiteral, Feature::TimestampLiteral])
    }

    fn aggregate_functions(&self) -> &AggregateTable {
        &MYSQL_AGGREGATES
    }

    fn string_style(&self) -> StringStyle {
        StringStyle::Backslash
    }

    fn primary_prefix(&self, p: &mut ExprParser<'_>) -> HookResult<NodeId> {
        if !p.is_name(names::BINARY) {
            return Ok(HookOutcome::NotApplicable);
        }
        let start = p.start();
        let mark = p.mark();
        p.next_token();
        if !starts_operand(p.kind()) || p.is(&TokenKind::LeftParen) {
            p.reset(mark);
            return Ok(HookOutcome::NotApplicable);
        }
        let operand = p.primary()?;
        Ok(HookOutcome::Handled(p.alloc(
            NodeKind::Unary {
                op: UnaryOp::Binary,
                operand,
            },
            start,
        )))
    }

    fn primary_identifier_rest(
        &self,
        p: &mut ExprParser<'_>,
        name: &str,
        hash: u64,
        start: usize,
    ) -> HookResult<NodeId> {
        if hash == names::MATCH {
            return Self::match_against(p, start);
        }
        if name.starts_with('_') && name.len() > 1 {
            if let TokenKind::String(value) = p.kind() {
                let value = value.clone();
                p.next_token();
                return Ok(HookOutcome::Handled(p.alloc(
                    NodeKind::Introducer {
                        charset: name.to_string(),
                        value,
                    },
                    start,
                )));
            }
        }
        Ok(HookOutcome::NotApplicable)
    }

    fn parse_interval(&self, p: &mut ExprParser<'_>, start: usize) -> HookResult<NodeId> {
        if p.is(&TokenKind::LeftParen) {
            let call = p.name_or_call(String::from("INTERVAL"), start)?;
            return Ok(HookOutcome::Handled(call));
        }
        let value = p.bit_or()?;
        let unit = p.interval_unit()?;
        Ok(HookOutcome::Handled(p.alloc(
            NodeKind::Interval {
                value,
                unit: Some(unit),
            },
            start,
        )))
    }

    fn method_rest_allow_identifier_method_specific(
        &self,
        p: &mut ExprParser<'_>,
        name: &str,
        hash: u64,
        start: usize,
    ) -> HookResult<NodeId> {
        if hash != CONVERT {
            return Ok(HookOutcome::NotApplicable);
        }
        let mark = p.mark();
        p.accept(&TokenKind::LeftParen)?;
        let expr = p.expr()?;
        if !p.eat(&TokenKind::Comma) {
            p.reset(mark);
            return Ok(HookOutcome::NotApplicable);
        }
        let data_type = p.data_type()?;
        p.accept(&TokenKind::RightParen)?;
        Ok(HookOutcome::Handled(p.alloc(
            NodeKind::MethodInvoke {
                owner: None,
                name: name.to_string(),
                args: vec![expr, data_type],
                curried: None,
                trim: None,
                from: None,
                for_expr: None,
                using: None,
            },
            start,
        )))
    }

    fn aggregate_args_rest(
        &self,
        p: &mut ExprParser<'_>,
        call: &mut AggregateCall,
    ) -> HookResult<()> {
        if fnv1a_64_lower(&call.name) != GROUP_CONCAT || !p.eat_name(names::SEPARATOR) {
            return Ok(HookOutcome::NotApplicable);
        }
        call.separator = Some(p.primary()?);
        Ok(HookOutcome::Handled(()))
    }

    fn or_rest_get_operator(&self) -> BinaryOp {
        BinaryOp::BooleanOr
    }
}
