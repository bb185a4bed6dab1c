//! Hive and the engines that share its grammar (ODPS, Spark, Databricks).

use std::sync::LazyLock;

use oxide_sql_core::ast::{NodeId, NodeKind};
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::dialect::{AggregateTable, Dialect, HookOutcome, HookResult};
use oxide_sql_core::hash::names;
use oxide_sql_core::lexer::{Keyword, LexerConfig, TokenKind};
use oxide_sql_core::parser::ExprParser;

/// Hive aggregate and window functions.
pub static HIVE_AGGREGATES: LazyLock<AggregateTable> = LazyLock::new(|| {
    AggregateTable::new(&[
        "AVG",
        "COLLECT_LIST",
        "COLLECT_SET",
        "CORR",
        "COUNT",
        "COVAR_POP",
        "COVAR_SAMP",
        "DENSE_RANK",
        "HISTOGRAM_NUMERIC",
        "MAX",
        "MIN",
        "NTILE",
        "PERCENTILE",
        "PERCENTILE_APPROX",
        "RANK",
        "ROW_NUMBER",
        "STDDEV",
        "STDDEV_POP",
        "STDDEV_SAMP",
        "SUM",
        "VAR_POP",
        "VAR_SAMP",
        "VARIANCE",
    ])
});

/// Lexical rules of the Hive family.
pub const HIVE_LEXER: LexerConfig = LexerConfig {
    backslash_escapes: true,
    double_quoted_strings: true,
    backtick_identifiers: true,
    ..LexerConfig::ANSI
};

/// The Hive dialect, parameterised by the family member it parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiveDialect {
    db_type: DbType,
}

impl HiveDialect {
    /// Creates a Hive-family dialect for `db_type`.
    #[must_use]
    pub const fn new(db_type: DbType) -> Self {
        Self { db_type }
    }
}

impl Default for HiveDialect {
    fn default() -> Self {
        Self::new(DbType::Hive)
    }
}

impl Dialect for HiveDialect {
    fn name(&self) -> &'static str {
        self.db_type.name()
    }

    fn db_type(&self) -> DbType {
        self.db_type
    }

    fn lexer_config(&self) -> LexerConfig {
        HIVE_LEXER
    }

    fn aggregate_functions(&self) -> &AggregateTable {
        &HIVE_AGGREGATES
    }

    /// `LATERAL VIEW [OUTER] f(..) [alias] [AS c1, c2]`
    fn parse_table_source_rest(
        &self,
        p: &mut ExprParser<'_>,
        source: NodeId,
    ) -> HookResult<NodeId> {
        if !p.is_name(names::LATERAL) {
            return Ok(HookOutcome::NotApplicable);
        }
        let mark = p.mark();
        p.next_token();
        if !p.eat_keyword(Keyword::View) {
            p.reset(mark);
            return Ok(HookOutcome::NotApplicable);
        }
        let outer = p.eat_keyword(Keyword::Outer);
        let function = p.primary()?;

        let alias = match p.kind() {
            TokenKind::Identifier(_) if !p.is_name(names::LATERAL) => Some(p.word()?),
            _ => None,
        };
        let mut columns = Vec::new();
        if p.eat_keyword(Keyword::As) {
            loop {
                columns.push(p.word()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let start = p.span_start(source);
        Ok(HookOutcome::Handled(p.alloc(
            NodeKind::LateralView {
                source,
                function,
                outer,
                alias,
                columns,
            },
            start,
        )))
    }
}
