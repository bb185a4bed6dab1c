//! # oxide-sql-core
//!
//! A multi-dialect SQL front end: a restartable lexer, a precedence-ladder
//! expression parser, a SELECT parser and an arena AST with parent links.
//!
//! Dialect differences are expressed through the [`Dialect`] trait. Every
//! hook returns a tri-state [`HookOutcome`]: the dialect handled the
//! construct, the construct does not apply, or the dialect rejects it.
//! Only [`GenericDialect`] lives here; concrete dialects are in
//! `oxide-sql-dialects`.
//!
//! ## Parsing an expression
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_sql_core::{Features, GenericDialect, parse_expression};
//!
//! let parsed = parse_expression("a + b * 2", Arc::new(GenericDialect::default()), Features::empty())
//!     .unwrap();
//! assert_eq!(parsed.ast.to_sql(parsed.root), "a + b * 2");
//! ```
//!
//! ## Collecting tables
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_sql_core::{Features, GenericDialect, TableCollector, parse_statements};
//!
//! let parsed = parse_statements(
//!     "SELECT * FROM a JOIN b ON a.id = b.id",
//!     Arc::new(GenericDialect::default()),
//!     Features::empty(),
//! )
//! .unwrap();
//! let tables = TableCollector::collect(&parsed.ast, parsed.statements[0]);
//! assert_eq!(tables, vec!["a", "b"]);
//! ```

pub mod ast;
pub mod dbtype;
pub mod dialect;
pub mod feature;
pub mod hash;
pub mod lexer;
pub mod parser;
pub mod visitor;

pub use ast::{Ast, BinaryOp, NodeId, NodeKind, UnaryOp};
pub use dbtype::DbType;
pub use dialect::{Dialect, GenericDialect, HookOutcome, HookResult};
pub use feature::{Feature, Features};
pub use lexer::{Keyword, Lexer, LexerConfig, Token, TokenKind};
pub use parser::{
    ExprParser, ParsedExpr, ParsedStatements, ParserMark, SqlError, StatementParser,
    parse_expression, parse_statement, parse_statements,
};
pub use visitor::{TableCollector, Visitor};
