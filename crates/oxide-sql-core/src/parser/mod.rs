//! SQL parser.
//!
//! [`ExprParser`] is a hand-written recursive descent parser organised as
//! a fixed precedence ladder:
//!
//! ```text
//! primary → bitXor → multiplicative → additive → shift → bitAnd → bitOr
//!         → in / relational → and → xor → or
//! ```
//!
//! Each level parses its tighter neighbour, then loops over its own
//! operators, which makes every binary operator left-associative. The
//! active [`Dialect`] is consulted through its hooks at fixed points of
//! the ladder. [`StatementParser`] adds `;`-separated statement lists on
//! top of the SELECT grammar.

mod data_type;
mod error;
mod expr;
mod method;
mod primary;
mod select;
mod statement;

use std::sync::Arc;

use tracing::{debug, trace};

pub use data_type::DataTypeSpec;
pub use error::{Location, Result, SqlError, TokenInfo};
pub use method::AggregateCall;
pub use statement::{ParsedStatements, StatementParser, parse_statement, parse_statements};

use crate::ast::{Ast, BinaryOp, NodeId, NodeKind};
use crate::dialect::{Dialect, HookOutcome};
use crate::feature::{Feature, Features};
use crate::hash::{fnv1a_64_lower, unquote};
use crate::lexer::{Keyword, Lexer, Mark, Span, Token, TokenKind};

/// A parsed expression and the arena holding it.
#[derive(Debug, Clone)]
pub struct ParsedExpr {
    /// The arena.
    pub ast: Ast,
    /// The expression root.
    pub root: NodeId,
}

/// Parses a complete expression in `dialect`.
///
/// # Errors
///
/// Returns an error if the text is not a single valid expression.
pub fn parse_expression(
    sql: &str,
    dialect: Arc<dyn Dialect>,
    features: Features,
) -> Result<ParsedExpr> {
    let mut parser = ExprParser::new(sql, dialect, features);
    let root = parser.expr()?;
    parser.expect_eof()?;
    Ok(ParsedExpr {
        ast: parser.into_ast(),
        root,
    })
}

/// A parser snapshot taken by [`ExprParser::mark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserMark {
    lexer: Mark,
    variant_index: u32,
    pending_gt: u8,
}

impl ParserMark {
    /// The lexer part of the snapshot.
    #[must_use]
    pub const fn lexer(&self) -> &Mark {
        &self.lexer
    }
}

/// Expression parser over one input string.
///
/// The parser owns its lexer and AST arena. It is not shared between
/// threads; parse different inputs with different parsers.
#[derive(Debug)]
pub struct ExprParser<'a> {
    lexer: Lexer<'a>,
    dialect: Arc<dyn Dialect>,
    features: Features,
    ast: Ast,
    /// Number of `?` placeholders seen so far.
    variant_index: u32,
    /// `>` still owed after splitting a `>>` token in `ARRAY<ARRAY<T>>`.
    pending_gt: u8,
}

impl<'a> ExprParser<'a> {
    /// Creates a parser. `features` are added to the dialect defaults.
    #[must_use]
    pub fn new(sql: &'a str, dialect: Arc<dyn Dialect>, features: Features) -> Self {
        let features = dialect.default_features().union(features);
        let lexer = Lexer::with_config(sql, dialect.lexer_config(), features);
        Self::from_lexer(lexer, dialect)
    }

    /// Creates a parser over a lexer that has not been advanced yet.
    #[must_use]
    pub fn from_lexer(mut lexer: Lexer<'a>, dialect: Arc<dyn Dialect>) -> Self {
        let features = lexer.features();
        lexer.next_token();
        debug!(dialect = dialect.name(), features = features.bits(), "parser created");
        Self {
            lexer,
            dialect,
            features,
            ast: Ast::new(),
            variant_index: 0,
            pending_gt: 0,
        }
    }

    /// Returns the active dialect.
    #[must_use]
    pub const fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    /// Returns the enabled features.
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// Returns true if `feature` is enabled.
    #[must_use]
    pub const fn is_enabled(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    /// Returns the lexer.
    #[must_use]
    pub const fn lexer(&self) -> &Lexer<'a> {
        &self.lexer
    }

    /// Removes and returns the comments recorded by the lexer.
    pub fn take_comments(&mut self) -> Vec<String> {
        self.lexer.take_comments()
    }

    /// Returns the arena built so far.
    #[must_use]
    pub const fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Returns the arena for in-place edits.
    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Consumes the parser and returns its arena.
    #[must_use]
    pub fn into_ast(self) -> Ast {
        self.ast
    }

    // ---- cursor ------------------------------------------------------

    /// Returns the current token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        self.lexer.token()
    }

    /// Returns the kind of the current token.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.lexer.token().kind
    }

    /// Advances to the next token.
    pub fn next_token(&mut self) {
        self.lexer.next_token();
    }

    /// Snapshots the cursor and placeholder numbering for speculative
    /// parsing.
    #[must_use]
    pub fn mark(&self) -> ParserMark {
        ParserMark {
            lexer: self.lexer.mark(),
            variant_index: self.variant_index,
            pending_gt: self.pending_gt,
        }
    }

    /// Restores a snapshot taken by [`ExprParser::mark`].
    pub fn reset(&mut self, mark: ParserMark) {
        trace!(offset = mark.lexer.offset(), "parser backtracked");
        self.lexer.reset(mark.lexer);
        self.variant_index = mark.variant_index;
        self.pending_gt = mark.pending_gt;
    }

    /// Number of `?` placeholders numbered so far.
    #[must_use]
    pub const fn placeholder_count(&self) -> u32 {
        self.variant_index
    }

    /// Byte offset where the current token starts.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.lexer.token().span.start
    }

    /// Byte offset where node `id` starts.
    #[must_use]
    pub fn span_start(&self, id: NodeId) -> usize {
        self.ast.span(id).start
    }

    /// Source text of the current token; identifiers keep their quotes.
    #[must_use]
    pub fn token_text(&self) -> String {
        let token = self.lexer.token();
        match &token.kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => token
                .span
                .slice(self.lexer.input())
                .map_or_else(|| token.text(), str::to_string),
        }
    }

    /// Lower-case hash of the current token if it is an identifier.
    ///
    /// Quoted identifiers hash with their quotes, so they never match a
    /// grammar word.
    #[must_use]
    pub fn identifier_hash(&self) -> Option<u64> {
        match self.kind() {
            TokenKind::Identifier(name) => Some(fnv1a_64_lower(name)),
            _ => None,
        }
    }

    /// Returns true if the current token is `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind(), TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Returns true if the current token is the bare word with `hash`.
    #[must_use]
    pub fn is_name(&self, hash: u64) -> bool {
        self.identifier_hash() == Some(hash)
    }

    /// Returns true if the current token is the punctuation `kind`.
    #[must_use]
    pub fn is(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    /// Consumes `keyword` if it is the current token.
    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.is_keyword(keyword);
        if found {
            self.next_token();
        }
        found
    }

    /// Consumes the bare word with `hash` if it is the current token.
    pub fn eat_name(&mut self, hash: u64) -> bool {
        let found = self.is_name(hash);
        if found {
            self.next_token();
        }
        found
    }

    /// Consumes `kind` if it is the current token.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        let found = self.is(kind);
        if found {
            self.next_token();
        }
        found
    }

    /// Consumes `kind` or fails.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming the expected token.
    pub fn accept(&mut self, kind: &TokenKind) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    /// Consumes `keyword` or fails.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming the keyword.
    pub fn accept_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Consumes the bare word `name` (with pre-computed `hash`) or fails.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming the word.
    pub fn accept_name(&mut self, hash: u64, name: &str) -> Result<()> {
        if self.eat_name(hash) {
            Ok(())
        } else {
            Err(self.unexpected(name))
        }
    }

    /// Consumes an identifier or keyword and returns its text.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the current token is not a word.
    pub fn word(&mut self) -> Result<String> {
        if !self.kind().is_word() {
            return Err(self.unexpected("IDENTIFIER"));
        }
        let text = self.name_text(self.token_text());
        self.next_token();
        Ok(text)
    }

    /// Requires the end of input.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for any trailing token.
    pub fn expect_eof(&self) -> Result<()> {
        if self.token().is_eof() {
            Ok(())
        } else {
            Err(self.unexpected("EOF"))
        }
    }

    // ---- errors ------------------------------------------------------

    /// Syntax error at the current token.
    #[must_use]
    pub fn syntax_error(&self, message: impl Into<String>) -> SqlError {
        SqlError::syntax(message, self.token())
    }

    /// "expect X, actual Y" error at the current token.
    #[must_use]
    pub fn unexpected(&self, expected: &str) -> SqlError {
        SqlError::unexpected(expected, self.token())
    }

    /// Unsupported-construct error at the current token.
    #[must_use]
    pub fn unsupported(&self, message: impl Into<String>) -> SqlError {
        SqlError::unsupported(message, self.token())
    }

    // ---- nodes -------------------------------------------------------

    /// Allocates a node spanning from `start` to the last consumed token.
    pub fn alloc(&mut self, kind: NodeKind, start: usize) -> NodeId {
        let end = self.lexer.prev_end().max(start);
        self.ast.alloc_at(kind, Span::new(start, end))
    }

    /// Allocates `left op right`.
    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        let start = self.span_start(left);
        self.alloc(NodeKind::Binary { op, left, right }, start)
    }

    /// Applies [`Feature::IgnoreNameQuotes`] to a name.
    #[must_use]
    pub fn name_text(&self, raw: String) -> String {
        if self.is_enabled(Feature::IgnoreNameQuotes) {
            let unquoted = unquote(&raw);
            if unquoted.len() != raw.len() {
                return unquoted.to_string();
            }
        }
        raw
    }

    /// Resolves a hook outcome: `Unsupported` becomes an error.
    fn resolve<T>(&self, hook: &'static str, outcome: HookOutcome<T>) -> Result<Option<T>> {
        match outcome {
            HookOutcome::Handled(value) => {
                trace!(hook, dialect = self.dialect.name(), "dialect hook handled");
                Ok(Some(value))
            }
            HookOutcome::NotApplicable => Ok(None),
            HookOutcome::Unsupported(message) => {
                debug!(hook, dialect = self.dialect.name(), "dialect hook rejected construct");
                Err(self.unsupported(message))
            }
        }
    }

    /// Clones the dialect handle so hooks can borrow the parser mutably.
    fn hooks(&self) -> Arc<dyn Dialect> {
        Arc::clone(&self.dialect)
    }
}
