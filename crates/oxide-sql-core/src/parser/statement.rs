//! Statement lists.

use std::sync::Arc;

use tracing::debug;

use super::{ExprParser, Result};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::dialect::Dialect;
use crate::feature::{Feature, Features};
use crate::lexer::{Keyword, TokenKind};

/// Statements parsed from one input, sharing one arena.
#[derive(Debug, Clone)]
pub struct ParsedStatements {
    /// The arena.
    pub ast: Ast,
    /// Statement roots in source order.
    pub statements: Vec<NodeId>,
}

/// Parses `;`-separated statements on top of an [`ExprParser`].
///
/// Only queries are understood; other statement keywords are reported as
/// unsupported.
#[derive(Debug)]
pub struct StatementParser<'a> {
    parser: ExprParser<'a>,
}

impl<'a> StatementParser<'a> {
    /// Creates a statement parser over `sql`.
    #[must_use]
    pub fn new(sql: &'a str, dialect: Arc<dyn Dialect>, features: Features) -> Self {
        Self::from_expr_parser(ExprParser::new(sql, dialect, features))
    }

    /// Wraps an existing expression parser.
    #[must_use]
    pub const fn from_expr_parser(parser: ExprParser<'a>) -> Self {
        Self { parser }
    }

    /// Returns the underlying expression parser.
    #[must_use]
    pub const fn expr_parser(&self) -> &ExprParser<'a> {
        &self.parser
    }

    /// Returns the underlying expression parser mutably.
    pub fn expr_parser_mut(&mut self) -> &mut ExprParser<'a> {
        &mut self.parser
    }

    /// Consumes the parser and returns its arena.
    #[must_use]
    pub fn into_ast(self) -> Ast {
        self.parser.into_ast()
    }

    /// Parses statements until the end of input.
    ///
    /// # Errors
    ///
    /// Returns the first error met; statements before it are discarded.
    pub fn parse_statement_list(&mut self) -> Result<Vec<NodeId>> {
        let mut statements = Vec::new();
        loop {
            while self.parser.eat(&TokenKind::Semicolon) {}
            if self.parser.token().is_eof() {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        debug!(count = statements.len(), "parsed statement list");
        Ok(statements)
    }

    /// Parses one statement at the cursor.
    ///
    /// # Errors
    ///
    /// Returns an unsupported error for statements other than queries and
    /// a syntax error for anything that does not start a statement.
    pub fn parse_statement(&mut self) -> Result<NodeId> {
        let start = self.parser.start();
        let statement = match self.parser.kind() {
            TokenKind::Keyword(Keyword::Select | Keyword::With) | TokenKind::LeftParen => {
                let query = self.parser.query()?;
                self.parser
                    .alloc(NodeKind::SelectStatement { query }, start)
            }
            TokenKind::Keyword(
                keyword @ (Keyword::Insert
                | Keyword::Update
                | Keyword::Delete
                | Keyword::Create
                | Keyword::Drop
                | Keyword::Alter
                | Keyword::Truncate
                | Keyword::Grant
                | Keyword::Revoke
                | Keyword::Set
                | Keyword::Replace
                | Keyword::Declare
                | Keyword::Lock
                | Keyword::Comment),
            ) => {
                let message = format!("{} statement", keyword.as_str());
                return Err(self.parser.unsupported(message));
            }
            _ => return Err(self.parser.unexpected("statement")),
        };

        if self.parser.is_enabled(Feature::KeepComments) {
            let comments = self.parser.take_comments();
            self.parser.ast_mut().add_comments(statement, comments);
        }
        Ok(statement)
    }
}

/// Parses every statement in `sql`.
///
/// # Errors
///
/// Returns the first lexical, syntax or unsupported error.
pub fn parse_statements(
    sql: &str,
    dialect: Arc<dyn Dialect>,
    features: Features,
) -> Result<ParsedStatements> {
    let mut parser = StatementParser::new(sql, dialect, features);
    let statements = parser.parse_statement_list()?;
    Ok(ParsedStatements {
        ast: parser.into_ast(),
        statements,
    })
}

/// Parses exactly one statement, optionally followed by `;`.
///
/// # Errors
///
/// Returns an error if the input holds no statement, more than one, or
/// an invalid one.
pub fn parse_statement(
    sql: &str,
    dialect: Arc<dyn Dialect>,
    features: Features,
) -> Result<ParsedStatements> {
    let mut parser = StatementParser::new(sql, dialect, features);
    while parser.parser.eat(&TokenKind::Semicolon) {}
    let statement = parser.parse_statement()?;
    while parser.parser.eat(&TokenKind::Semicolon) {}
    parser.parser.expect_eof()?;
    Ok(ParsedStatements {
        ast: parser.into_ast(),
        statements: vec![statement],
    })
}
