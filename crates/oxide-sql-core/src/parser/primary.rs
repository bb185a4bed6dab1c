//! The leaf of the ladder: literals, names, prefix operators and the
//! keyword-led productions.

use super::{ExprParser, Result};
use crate::ast::{NodeId, NodeKind, Quantifier, SequenceFunction, TypedLiteralKind, UnaryOp};
use crate::feature::Feature;
use crate::hash::{fnv1a_64_lower, names};
use crate::lexer::{Keyword, TokenKind};

/// Keywords that read as plain names when they start an expression, as in
/// `LEFT(s, 2)` or `SELECT key FROM t`.
const NAME_KEYWORDS: &[Keyword] = &[
    Keyword::Cascade,
    Keyword::Check,
    Keyword::Column,
    Keyword::Comment,
    Keyword::Constraint,
    Keyword::Cursor,
    Keyword::Database,
    Keyword::Desc,
    Keyword::End,
    Keyword::Escape,
    Keyword::Except,
    Keyword::Fetch,
    Keyword::Full,
    Keyword::Grant,
    Keyword::Group,
    Keyword::If,
    Keyword::Index,
    Keyword::Inner,
    Keyword::Intersect,
    Keyword::Key,
    Keyword::Left,
    Keyword::Limit,
    Keyword::Lock,
    Keyword::Loop,
    Keyword::Minus,
    Keyword::Offset,
    Keyword::Order,
    Keyword::Outer,
    Keyword::Over,
    Keyword::Partition,
    Keyword::Primary,
    Keyword::Procedure,
    Keyword::Replace,
    Keyword::Right,
    Keyword::Row,
    Keyword::Schema,
    Keyword::Table,
    Keyword::To,
    Keyword::Top,
    Keyword::Trigger,
    Keyword::Truncate,
    Keyword::User,
    Keyword::Values,
    Keyword::View,
    Keyword::Window,
];

impl ExprParser<'_> {
    /// Parses a primary expression and its postfix operators.
    ///
    /// # Errors
    ///
    /// Returns an error if no expression starts at the cursor.
    pub fn primary(&mut self) -> Result<NodeId> {
        let hooks = self.hooks();
        let outcome = hooks.primary_prefix(self)?;
        if let Some(expr) = self.resolve("primary_prefix", outcome)? {
            return Ok(expr);
        }

        let start = self.start();
        let expr = match self.kind().clone() {
            TokenKind::LeftParen => self.paren_primary(start)?,
            TokenKind::Identifier(raw) => self.identifier_primary(raw, start)?,
            TokenKind::Keyword(keyword) => return self.keyword_primary(keyword, start),
            TokenKind::Integer(value) => {
                self.next_token();
                self.alloc(NodeKind::Integer(value), start)
            }
            TokenKind::Float(text) => {
                self.next_token();
                self.alloc(NodeKind::Number(text), start)
            }
            TokenKind::Decimal(text) => {
                self.next_token();
                self.alloc(NodeKind::Decimal(text), start)
            }
            TokenKind::String(value) => {
                self.next_token();
                let literal = self.alloc(NodeKind::Char(value), start);
                let outcome = hooks.primary_literal_chars_rest(self, literal)?;
                self.resolve("primary_literal_chars_rest", outcome)?
                    .unwrap_or(literal)
            }
            TokenKind::NString(value) => {
                self.next_token();
                self.alloc(NodeKind::NChar(value), start)
            }
            TokenKind::Hex(digits) => {
                self.next_token();
                self.alloc(NodeKind::Hex(digits), start)
            }
            TokenKind::Bits(digits) => {
                self.next_token();
                self.alloc(NodeKind::Bits(digits), start)
            }
            TokenKind::Variable(name) => {
                self.next_token();
                self.alloc(NodeKind::Variant { name, index: None }, start)
            }
            TokenKind::Colon if self.is_enabled(Feature::PrimaryVariantColon) => {
                self.colon_variant(start)?
            }
            TokenKind::Question => {
                self.next_token();
                let index = self.variant_index;
                self.variant_index += 1;
                self.alloc(
                    NodeKind::Variant {
                        name: String::from("?"),
                        index: Some(index),
                    },
                    start,
                )
            }
            TokenKind::Minus => return self.negative(start),
            TokenKind::Plus => return self.unary(UnaryOp::Plus, start),
            TokenKind::BitNot => return self.unary(UnaryOp::Compl, start),
            TokenKind::Bang => return self.unary(UnaryOp::Not, start),
            TokenKind::BangBang if self.is_enabled(Feature::PrimaryBangBang) => {
                return self.unary(UnaryOp::NotNot, start);
            }
            TokenKind::LeftBracket => {
                self.next_token();
                self.array_items(false, None, start)?
            }
            TokenKind::LeftBrace if self.is_enabled(Feature::OdbcEscape) => self.odbc_escape(start)?,
            _ => return self.primary_fallback(),
        };
        self.primary_rest(expr)
    }

    fn primary_fallback(&mut self) -> Result<NodeId> {
        let hooks = self.hooks();
        let outcome = hooks.primary_common(self)?;
        match self.resolve("primary_common", outcome)? {
            Some(expr) => self.primary_rest(expr),
            None => Err(self.unexpected("expression")),
        }
    }

    /// `(` starts a parenthesised expression, a row, `()` or a subquery.
    fn paren_primary(&mut self, start: usize) -> Result<NodeId> {
        self.next_token();
        if self.eat(&TokenKind::RightParen) {
            return Ok(self.alloc(NodeKind::List { items: Vec::new() }, start));
        }
        if matches!(
            self.kind(),
            TokenKind::Keyword(Keyword::Select | Keyword::With)
        ) {
            let query = self.query()?;
            self.accept(&TokenKind::RightParen)?;
            return Ok(self.alloc(NodeKind::Subquery { query }, start));
        }

        let first = self.expr()?;
        if self.is(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) {
                items.push(self.expr()?);
            }
            self.accept(&TokenKind::RightParen)?;
            return Ok(self.alloc(NodeKind::List { items }, start));
        }
        self.accept(&TokenKind::RightParen)?;
        self.ast_mut().set_parenthesized(first, true);
        Ok(first)
    }

    /// `:name` bind variable. The name must follow the colon directly.
    fn colon_variant(&mut self, start: usize) -> Result<NodeId> {
        let colon_end = self.token().span.end;
        self.next_token();
        if self.start() != colon_end {
            return Err(self.unexpected("variable name"));
        }
        let name = match self.kind() {
            TokenKind::Identifier(raw) => raw.clone(),
            TokenKind::Integer(_) | TokenKind::Keyword(_) => self
                .token()
                .span
                .slice(self.lexer().input())
                .map_or_else(|| self.token().text(), str::to_string),
            _ => return Err(self.unexpected("variable name")),
        };
        self.next_token();
        Ok(self.alloc(
            NodeKind::Variant {
                name: format!(":{name}"),
                index: None,
            },
            start,
        ))
    }

    /// A bare word: a special form, a dialect construct, a call or a
    /// plain name.
    fn identifier_primary(&mut self, raw: String, start: usize) -> Result<NodeId> {
        let hash = fnv1a_64_lower(&raw);
        self.next_token();

        if let Some(expr) = self.identifier_special(hash, start)? {
            return Ok(expr);
        }

        let hooks = self.hooks();
        let outcome = hooks.primary_identifier_rest(self, &raw, hash, start)?;
        if let Some(expr) = self.resolve("primary_identifier_rest", outcome)? {
            return Ok(expr);
        }

        let name = self.name_text(raw);
        self.name_or_call(name, start)
    }

    /// Forms introduced by a grammar word. The word has been consumed.
    fn identifier_special(&mut self, hash: u64, start: usize) -> Result<Option<NodeId>> {
        let next_is_string = matches!(self.kind(), TokenKind::String(_));
        let typed = match hash {
            names::DATE if next_is_string && self.is_enabled(Feature::DateLiteral) => {
                Some(TypedLiteralKind::Date)
            }
            names::TIMESTAMP if next_is_string && self.is_enabled(Feature::TimestampLiteral) => {
                Some(TypedLiteralKind::Timestamp)
            }
            names::TIME if next_is_string => Some(TypedLiteralKind::Time),
            names::DATETIME if next_is_string => Some(TypedLiteralKind::DateTime),
            _ => None,
        };
        if let Some(kind) = typed {
            let value = self.string_literal()?;
            return Ok(Some(self.alloc(NodeKind::TypedLiteral { kind, value }, start)));
        }

        let expr = match hash {
            names::TRY_CAST if self.is(&TokenKind::LeftParen) => self.cast_rest(true, start)?,
            names::DECIMAL if next_is_string => {
                let value = self.string_literal()?;
                self.alloc(NodeKind::Decimal(value), start)
            }
            names::ARRAY if self.is(&TokenKind::LeftBracket) => {
                self.next_token();
                self.array_items(true, None, start)?
            }
            names::ARRAY if self.is(&TokenKind::Lt) => {
                let mark = self.mark();
                self.next_token();
                let element = match self.data_type() {
                    Ok(element) if self.accept_gt() && self.eat(&TokenKind::LeftBracket) => element,
                    _ => {
                        self.pending_gt = 0;
                        self.reset(mark);
                        return Ok(None);
                    }
                };
                self.array_items(true, Some(element), start)?
            }
            names::CURRENT_USER
                if self.is_enabled(Feature::EnableCurrentUserExpr)
                    && !self.is(&TokenKind::LeftParen) =>
            {
                self.alloc(NodeKind::CurrentUser, start)
            }
            names::CURRENT if self.is_name(names::OF) => {
                self.next_token();
                let cursor = self.word()?;
                self.alloc(NodeKind::CurrentOf { cursor }, start)
            }
            names::NEXTVAL | names::CURRVAL | names::PREVVAL
                if self.is_keyword(Keyword::For) =>
            {
                self.next_token();
                let name = self.qualified_name()?;
                let function = sequence_function(hash);
                self.alloc(NodeKind::Sequence { name, function }, start)
            }
            names::GROUPING if self.is_name(names::SETS) => {
                self.next_token();
                self.accept(&TokenKind::LeftParen)?;
                if self.is_enabled(Feature::PrimaryRestCommaAfterLparen) {
                    self.eat(&TokenKind::Comma);
                }
                let items = if self.is(&TokenKind::RightParen) {
                    Vec::new()
                } else {
                    self.expr_list()?
                };
                self.accept(&TokenKind::RightParen)?;
                self.alloc(NodeKind::GroupingSets { items }, start)
            }
            _ => return Ok(None),
        };
        Ok(Some(expr))
    }

    /// A name, or a call when `(` follows.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed call.
    pub fn name_or_call(&mut self, name: String, start: usize) -> Result<NodeId> {
        if self.is(&TokenKind::LeftParen) {
            self.method_rest(None, name, start)
        } else {
            Ok(self.alloc(NodeKind::Identifier(name), start))
        }
    }

    /// `name` or `owner.name`, without calls.
    ///
    /// # Errors
    ///
    /// Returns an error if a part is not a word.
    pub fn qualified_name(&mut self) -> Result<NodeId> {
        let start = self.start();
        let first = self.word()?;
        let mut name = self.alloc(NodeKind::Identifier(first), start);
        while self.eat(&TokenKind::Dot) {
            let part = self.word()?;
            name = self.alloc(
                NodeKind::Property {
                    owner: name,
                    name: part,
                },
                start,
            );
        }
        Ok(name)
    }

    /// Consumes a string literal and returns its value.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the current token is not a string.
    pub fn string_literal(&mut self) -> Result<String> {
        match self.kind() {
            TokenKind::String(value) => {
                let value = value.clone();
                self.next_token();
                Ok(value)
            }
            _ => Err(self.unexpected("LITERAL_CHARS")),
        }
    }

    fn keyword_primary(&mut self, keyword: Keyword, start: usize) -> Result<NodeId> {
        let expr = match keyword {
            Keyword::Null => {
                self.next_token();
                self.alloc(NodeKind::Null, start)
            }
            Keyword::True | Keyword::False => {
                self.next_token();
                self.alloc(NodeKind::Boolean(keyword == Keyword::True), start)
            }
            Keyword::Default => {
                self.next_token();
                self.alloc(NodeKind::Default, start)
            }
            Keyword::Case => self.case_expr(start)?,
            Keyword::Cast => {
                self.next_token();
                self.cast_rest(false, start)?
            }
            Keyword::Exists => {
                let text = self.token_text();
                self.next_token();
                if matches!(
                    self.kind(),
                    TokenKind::Comma | TokenKind::Dot | TokenKind::RightParen | TokenKind::Eof
                ) {
                    self.alloc(NodeKind::Identifier(text), start)
                } else {
                    self.exists_rest(false, start)?
                }
            }
            Keyword::Not => {
                self.next_token();
                if self.eat_keyword(Keyword::Exists) {
                    return self.exists_rest(true, start);
                }
                let operand = self.relational()?;
                return Ok(self.alloc(NodeKind::Not { operand }, start));
            }
            Keyword::Select | Keyword::With => {
                let query = self.query()?;
                self.alloc(NodeKind::Subquery { query }, start)
            }
            Keyword::Any | Keyword::Some | Keyword::All => self.quantified(keyword, start)?,
            Keyword::Interval => {
                self.next_token();
                self.interval_rest(start)?
            }
            _ if NAME_KEYWORDS.contains(&keyword) => {
                let name = self.token_text();
                self.next_token();
                self.name_or_call(name, start)?
            }
            _ => return self.primary_fallback(),
        };
        self.primary_rest(expr)
    }

    /// `CASE [value] WHEN .. THEN .. [ELSE ..] END`
    fn case_expr(&mut self, start: usize) -> Result<NodeId> {
        self.next_token();
        let value = if self.is_keyword(Keyword::When) {
            None
        } else {
            Some(self.expr()?)
        };

        let mut whens = Vec::new();
        while self.is_keyword(Keyword::When) {
            let when_start = self.start();
            self.next_token();
            let condition = self.expr()?;
            self.accept_keyword(Keyword::Then)?;
            let result = self.expr()?;
            whens.push(self.alloc(NodeKind::CaseWhen { condition, result }, when_start));
        }
        if whens.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let else_result = if self.eat_keyword(Keyword::Else) {
            Some(self.expr()?)
        } else {
            None
        };
        self.accept_keyword(Keyword::End)?;
        Ok(self.alloc(
            NodeKind::Case {
                value,
                whens,
                else_result,
            },
            start,
        ))
    }

    /// `(expr AS type)` after `CAST` or `TRY_CAST`.
    fn cast_rest(&mut self, try_cast: bool, start: usize) -> Result<NodeId> {
        self.accept(&TokenKind::LeftParen)?;
        let expr = self.expr()?;
        self.accept_keyword(Keyword::As)?;
        let data_type = self.data_type()?;
        self.accept(&TokenKind::RightParen)?;
        Ok(self.alloc(
            NodeKind::Cast {
                expr,
                data_type,
                try_cast,
                postfix: false,
            },
            start,
        ))
    }

    /// `(query)` after `[NOT] EXISTS`.
    fn exists_rest(&mut self, not: bool, start: usize) -> Result<NodeId> {
        self.accept(&TokenKind::LeftParen)?;
        let query = self.query()?;
        self.accept(&TokenKind::RightParen)?;
        Ok(self.alloc(NodeKind::Exists { query, not }, start))
    }

    /// `ANY (SELECT ..)`; without a subquery the word is a name or call.
    fn quantified(&mut self, keyword: Keyword, start: usize) -> Result<NodeId> {
        let mark = self.mark();
        let name = self.token_text();
        self.next_token();
        if self.eat(&TokenKind::LeftParen)
            && matches!(
                self.kind(),
                TokenKind::Keyword(Keyword::Select | Keyword::With)
            )
        {
            let query = self.query()?;
            self.accept(&TokenKind::RightParen)?;
            let quantifier = match keyword {
                Keyword::Any => Quantifier::Any,
                Keyword::Some => Quantifier::Some,
                _ => Quantifier::All,
            };
            return Ok(self.alloc(NodeKind::Quantified { quantifier, query }, start));
        }
        self.reset(mark);
        self.next_token();
        self.name_or_call(name, start)
    }

    /// The operand and unit of `INTERVAL`, which has been consumed.
    fn interval_rest(&mut self, start: usize) -> Result<NodeId> {
        if matches!(
            self.kind(),
            TokenKind::Comma
                | TokenKind::RightParen
                | TokenKind::Semicolon
                | TokenKind::Eof
                | TokenKind::Dot
                | TokenKind::Keyword(_)
        ) {
            let name = self
                .lexer()
                .input()
                .get(start..self.lexer().prev_end())
                .unwrap_or("INTERVAL")
                .to_string();
            return Ok(self.alloc(NodeKind::Identifier(name), start));
        }

        let hooks = self.hooks();
        let outcome = hooks.parse_interval(self, start)?;
        if let Some(expr) = self.resolve("parse_interval", outcome)? {
            return Ok(expr);
        }

        let value = self.bit_or()?;
        let is_string = matches!(self.ast().kind(value), NodeKind::Char(_));
        let unit = if matches!(self.kind(), TokenKind::Identifier(_)) {
            Some(self.interval_unit()?)
        } else if is_string {
            None
        } else {
            return Err(self.unexpected("interval unit"));
        };
        Ok(self.alloc(NodeKind::Interval { value, unit }, start))
    }

    /// `DAY`, `YEAR_MONTH` or `DAY TO SECOND`, upper-cased.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the unit is not a word.
    pub fn interval_unit(&mut self) -> Result<String> {
        let mut unit = self.word()?.to_ascii_uppercase();
        if self.eat_keyword(Keyword::To) {
            unit.push_str(" TO ");
            unit.push_str(&self.word()?.to_ascii_uppercase());
        }
        Ok(unit)
    }

    /// Unary minus. Integer and float literals fold into a negative
    /// literal; everything else is wrapped.
    fn negative(&mut self, start: usize) -> Result<NodeId> {
        self.next_token();
        let folded = match self.kind().clone() {
            TokenKind::Integer(value) => NodeKind::Integer(-value),
            TokenKind::Float(text) => NodeKind::Number(format!("-{text}")),
            _ => {
                let operand = self.primary()?;
                return Ok(self.alloc(
                    NodeKind::Unary {
                        op: UnaryOp::Negative,
                        operand,
                    },
                    start,
                ));
            }
        };
        self.next_token();
        let literal = self.alloc(folded, start);
        self.primary_rest(literal)
    }

    fn unary(&mut self, op: UnaryOp, start: usize) -> Result<NodeId> {
        self.next_token();
        let operand = self.primary()?;
        Ok(self.alloc(NodeKind::Unary { op, operand }, start))
    }

    /// Array items after `[`, up to and including `]`.
    fn array_items(
        &mut self,
        prefixed: bool,
        element_type: Option<NodeId>,
        start: usize,
    ) -> Result<NodeId> {
        let items = if self.is(&TokenKind::RightBracket) {
            Vec::new()
        } else {
            self.expr_list()?
        };
        self.accept(&TokenKind::RightBracket)?;
        Ok(self.alloc(
            NodeKind::ArrayLiteral {
                items,
                prefixed,
                element_type,
            },
            start,
        ))
    }

    /// `{d '..'}`, `{t '..'}`, `{ts '..'}` and `{fn f(..)}`.
    fn odbc_escape(&mut self, start: usize) -> Result<NodeId> {
        self.next_token();
        let Some(hash) = self.identifier_hash() else {
            return Err(self.unexpected("IDENTIFIER"));
        };
        let kind = match hash {
            names::D => Some(TypedLiteralKind::Date),
            names::T => Some(TypedLiteralKind::Time),
            names::TS => Some(TypedLiteralKind::Timestamp),
            names::FN => None,
            _ => return Err(self.syntax_error("syntax error, unknown ODBC escape")),
        };
        self.next_token();
        let expr = match kind {
            Some(kind) => {
                let value = self.string_literal()?;
                self.alloc(NodeKind::TypedLiteral { kind, value }, start)
            }
            None => self.expr()?,
        };
        self.accept(&TokenKind::RightBrace)?;
        Ok(expr)
    }
}

pub(crate) const fn sequence_function(hash: u64) -> SequenceFunction {
    match hash {
        names::CURRVAL => SequenceFunction::CurrVal,
        names::PREVVAL => SequenceFunction::PrevVal,
        _ => SequenceFunction::NextVal,
    }
}
