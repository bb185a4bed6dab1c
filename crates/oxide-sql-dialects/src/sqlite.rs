//! SQLite.
//!
//! SQLite accepts three identifier quotes (`"a"`, `` `a` `` and `[a]`),
//! treats `||` as concatenation and has the word operators `GLOB`,
//! `MATCH` and `REGEXP`, each negatable with `NOT`. See
//! [SQLite expressions](https://www.sqlite.org/lang_expr.html).

use oxide_sql_core::ast::{BinaryOp, NodeId};
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::dialect::{Dialect, HookOutcome, HookResult};
use oxide_sql_core::hash::names;
use oxide_sql_core::lexer::LexerConfig;
use oxide_sql_core::parser::ExprParser;

use crate::support::infix;

/// Lexical rules of SQLite.
pub const SQLITE_LEXER: LexerConfig = LexerConfig {
    backtick_identifiers: true,
    bracket_identifiers: true,
    ..LexerConfig::ANSI
};

/// The SQLite dialect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        DbType::Sqlite.name()
    }

    fn db_type(&self) -> DbType {
        DbType::Sqlite
    }

    fn lexer_config(&self) -> LexerConfig {
        SQLITE_LEXER
    }

    fn relational_rest_identifier(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
        hash: u64,
        negated: bool,
    ) -> HookResult<NodeId> {
        let op = match (hash, negated) {
            (names::GLOB, false) => BinaryOp::Glob,
            (names::GLOB, true) => BinaryOp::NotGlob,
            (names::MATCH, false) => BinaryOp::Match,
            (names::MATCH, true) => BinaryOp::NotMatch,
            _ => return Ok(HookOutcome::NotApplicable),
        };
        infix(p, left, op)
    }
}
