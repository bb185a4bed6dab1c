//! The operator levels of the precedence ladder.

use super::{ExprParser, Result};
use crate::ast::{BinaryOp, NodeId, NodeKind};
use crate::feature::Feature;
use crate::hash::names;
use crate::lexer::{Keyword, TokenKind};

impl ExprParser<'_> {
    /// Parses a full expression.
    ///
    /// # Errors
    ///
    /// Returns an error if no expression starts at the cursor.
    pub fn expr(&mut self) -> Result<NodeId> {
        if self.is(&TokenKind::Star) {
            let start = self.start();
            self.next_token();
            return self.all_column_rest(None, start);
        }

        let expr = self.primary()?;
        match self.kind() {
            TokenKind::Comma => Ok(expr),
            TokenKind::Eq | TokenKind::EqEq => {
                let expr = self.relational_rest(expr)?;
                let expr = self.and_rest(expr)?;
                let expr = self.xor_rest(expr)?;
                self.or_rest(expr)
            }
            _ => self.expr_rest(expr),
        }
    }

    /// Runs every level's loop over an already parsed operand.
    ///
    /// # Errors
    ///
    /// Returns an error if an operator is not followed by an operand.
    pub fn expr_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        let expr = self.bit_xor_rest(expr)?;
        let expr = self.multiplicative_rest(expr)?;
        let expr = self.additive_rest(expr)?;
        let expr = self.shift_rest(expr)?;
        let expr = self.bit_and_rest(expr)?;
        let expr = self.bit_or_rest(expr)?;
        let expr = self.in_rest(expr)?;
        let expr = self.relational_rest(expr)?;
        let expr = self.and_rest(expr)?;
        let expr = self.xor_rest(expr)?;
        self.or_rest(expr)
    }

    /// Parses a comma-separated list of expressions.
    ///
    /// # Errors
    ///
    /// Returns an error if an item is not an expression.
    pub fn expr_list(&mut self) -> Result<Vec<NodeId>> {
        let mut items = vec![self.expr()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.expr()?);
        }
        Ok(items)
    }

    /// Parses a parenthesised, possibly empty, expression list.
    ///
    /// # Errors
    ///
    /// Returns an error if a parenthesis is missing or an item is invalid.
    pub fn paren_expr_list(&mut self) -> Result<Vec<NodeId>> {
        self.accept(&TokenKind::LeftParen)?;
        if self.eat(&TokenKind::RightParen) {
            return Ok(Vec::new());
        }
        let items = self.expr_list()?;
        self.accept(&TokenKind::RightParen)?;
        Ok(items)
    }

    // ---- bitXor --------------------------------------------------------

    /// Parses a primary and the `^`-level operators after it.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn bit_xor(&mut self) -> Result<NodeId> {
        let expr = self.primary()?;
        self.bit_xor_rest(expr)
    }

    /// Loops over `^`, `^ =` and the JSON/geometry operators.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn bit_xor_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        loop {
            let op = match self.kind() {
                TokenKind::Caret => BinaryOp::BitwiseXor,
                TokenKind::Arrow => BinaryOp::SubGt,
                TokenKind::DoubleArrow => BinaryOp::SubGtGt,
                TokenKind::PoundGt => BinaryOp::PoundGt,
                TokenKind::PoundGtGt => BinaryOp::PoundGtGt,
                TokenKind::LtDashGt => BinaryOp::LtDashGt,
                TokenKind::QuesQues => BinaryOp::QuesQues,
                TokenKind::QuesBar => BinaryOp::QuesBar,
                TokenKind::QuesQuesBar => BinaryOp::QuesQuesBar,
                TokenKind::QuesAmp => BinaryOp::QuesAmp,
                _ => return Ok(expr),
            };
            self.next_token();
            let op = if op == BinaryOp::BitwiseXor && self.eat(&TokenKind::Eq) {
                BinaryOp::BitwiseXorEq
            } else {
                op
            };
            let right = self.primary()?;
            expr = self.binary(op, expr, right);
        }
    }

    // ---- multiplicative ------------------------------------------------

    /// Parses a `*`-level expression.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn multiplicative(&mut self) -> Result<NodeId> {
        let expr = self.bit_xor()?;
        self.multiplicative_rest(expr)
    }

    /// Loops over `*`, `/`, `%`, `DIV` and `MOD`.
    ///
    /// `MOD` is only an operator when an operand follows it; `a MOD,`
    /// leaves `MOD` for the caller.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn multiplicative_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        loop {
            let op = match self.kind() {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Percent => BinaryOp::Modulus,
                TokenKind::Identifier(_) if self.is_name(names::DIV) => BinaryOp::Div,
                TokenKind::Identifier(_) if self.is_name(names::MOD) => {
                    let mark = self.mark();
                    self.next_token();
                    if matches!(
                        self.kind(),
                        TokenKind::Comma
                            | TokenKind::Eof
                            | TokenKind::RightParen
                            | TokenKind::Keyword(Keyword::On | Keyword::Where)
                    ) {
                        self.reset(mark);
                        return Ok(expr);
                    }
                    let right = self.bit_xor()?;
                    expr = self.binary(BinaryOp::Modulus, expr, right);
                    continue;
                }
                _ => return Ok(expr),
            };
            self.next_token();
            let right = self.bit_xor()?;
            expr = self.binary(op, expr, right);
        }
    }

    // ---- additive ------------------------------------------------------

    /// Parses a `+`-level expression.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn additive(&mut self) -> Result<NodeId> {
        let expr = self.multiplicative()?;
        self.additive_rest(expr)
    }

    /// Loops over `+`, `-` and, with [`Feature::PipesAsConcat`], `||`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn additive_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                TokenKind::Concat if self.is_enabled(Feature::PipesAsConcat) => BinaryOp::Concat,
                _ => return Ok(expr),
            };
            self.next_token();
            let right = self.multiplicative()?;
            expr = self.binary(op, expr, right);
        }
    }

    // ---- shift, bitAnd, bitOr -----------------------------------------

    /// Parses a shift expression.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn shift(&mut self) -> Result<NodeId> {
        let expr = self.additive()?;
        self.shift_rest(expr)
    }

    /// Loops over `<<`, `>>` and `>>>`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn shift_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        loop {
            let op = match self.kind() {
                TokenKind::LeftShift => BinaryOp::LeftShift,
                TokenKind::RightShift => BinaryOp::RightShift,
                TokenKind::UnsignedRightShift => BinaryOp::RightShiftUnsigned,
                _ => return Ok(expr),
            };
            self.next_token();
            let right = self.additive()?;
            expr = self.binary(op, expr, right);
        }
    }

    /// Parses a `&` expression.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn bit_and(&mut self) -> Result<NodeId> {
        let expr = self.shift()?;
        self.bit_and_rest(expr)
    }

    /// Loops over `&`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn bit_and_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        while self.eat(&TokenKind::BitAnd) {
            let right = self.shift()?;
            expr = self.binary(BinaryOp::BitwiseAnd, expr, right);
        }
        Ok(expr)
    }

    /// Parses a `|` expression: everything tighter than comparisons.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn bit_or(&mut self) -> Result<NodeId> {
        let expr = self.bit_and()?;
        self.bit_or_rest(expr)
    }

    /// Loops over `|`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn bit_or_rest(&mut self, mut expr: NodeId) -> Result<NodeId> {
        while self.eat(&TokenKind::BitOr) {
            let right = self.bit_and()?;
            expr = self.binary(BinaryOp::BitwiseOr, expr, right);
        }
        Ok(expr)
    }

    // ---- IN ------------------------------------------------------------

    /// Parses `[GLOBAL] [NOT] IN (...)` after `expr`.
    ///
    /// `IN PARTITION` and `IN ,` are not membership tests; the cursor is
    /// left where it was.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed list or subquery.
    pub fn in_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        let mark = self.mark();
        let global = self.eat_name(names::GLOBAL);
        let not = self.eat_keyword(Keyword::Not);
        if !self.eat_keyword(Keyword::In) {
            self.reset(mark);
            return Ok(expr);
        }
        if matches!(
            self.kind(),
            TokenKind::Keyword(Keyword::Partition) | TokenKind::Comma
        ) {
            self.reset(mark);
            return Ok(expr);
        }
        self.in_operand(expr, not, global)
    }

    fn in_operand(&mut self, expr: NodeId, not: bool, global: bool) -> Result<NodeId> {
        let start = self.span_start(expr);
        if !self.is(&TokenKind::LeftParen) {
            if !self.is_enabled(Feature::InRestSpecificOperation) {
                return Err(self.unexpected("LPAREN"));
            }
            let item = self.primary()?;
            return Ok(self.alloc(
                NodeKind::InList {
                    expr,
                    items: vec![item],
                    not,
                    global,
                },
                start,
            ));
        }

        self.next_token();
        if matches!(
            self.kind(),
            TokenKind::Keyword(Keyword::Select | Keyword::With)
        ) {
            let query = self.query()?;
            self.accept(&TokenKind::RightParen)?;
            return Ok(self.alloc(
                NodeKind::InSubquery {
                    expr,
                    query,
                    not,
                    global,
                },
                start,
            ));
        }

        let items = if self.is(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.expr_list()?
        };
        self.accept(&TokenKind::RightParen)?;
        Ok(self.alloc(
            NodeKind::InList {
                expr,
                items,
                not,
                global,
            },
            start,
        ))
    }

    // ---- relational ----------------------------------------------------

    /// Parses a comparison-level expression.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn relational(&mut self) -> Result<NodeId> {
        let expr = self.bit_or()?;
        self.relational_rest(expr)
    }

    /// Parses comparison, pattern and membership operators after `expr`.
    ///
    /// Operators that the active dialect does not recognise end the
    /// expression and are left for the caller.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand or when the dialect rejects
    /// an operator.
    #[allow(clippy::too_many_lines)]
    pub fn relational_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        let hooks = self.hooks();
        let simple = match self.kind() {
            TokenKind::Eq => Some(BinaryOp::Equality),
            TokenKind::ColonEq => Some(BinaryOp::Assignment),
            TokenKind::NotEq | TokenKind::CaretEq => Some(BinaryOp::NotEqual),
            TokenKind::LtGt => Some(BinaryOp::LessThanOrGreater),
            TokenKind::Lt => Some(BinaryOp::LessThan),
            TokenKind::LtEq => Some(BinaryOp::LessThanOrEqual),
            TokenKind::LtEqGt => Some(BinaryOp::LessThanOrEqualOrGreaterThan),
            TokenKind::Gt => Some(BinaryOp::GreaterThan),
            TokenKind::GtEq => Some(BinaryOp::GreaterThanOrEqual),
            TokenKind::NotLt => Some(BinaryOp::NotLessThan),
            TokenKind::NotGt => Some(BinaryOp::NotGreaterThan),
            TokenKind::AtGt => Some(BinaryOp::ArrayContains),
            TokenKind::LtAt => Some(BinaryOp::ArrayContainedBy),
            TokenKind::AtAt => Some(BinaryOp::AtAt),
            _ => None,
        };

        let result = if let Some(op) = simple {
            self.next_token();
            let right = self.bit_or()?;
            self.binary(op, expr, right)
        } else {
            match self.kind() {
                TokenKind::EqEq => {
                    let outcome = hooks.relational_rest_eqeq(self, expr)?;
                    match self.resolve("relational_rest_eqeq", outcome)? {
                        Some(result) => result,
                        None => {
                            self.next_token();
                            let right = self.bit_or()?;
                            self.binary(BinaryOp::EqEq, expr, right)
                        }
                    }
                }
                TokenKind::Keyword(Keyword::Is) => self.is_rest(expr)?,
                TokenKind::Keyword(Keyword::Like) => self.like_rest(expr, BinaryOp::Like)?,
                TokenKind::Keyword(Keyword::ILike) => self.like_rest(expr, BinaryOp::ILike)?,
                TokenKind::Keyword(Keyword::RLike) => self.like_rest(expr, BinaryOp::RLike)?,
                TokenKind::Keyword(Keyword::Between) => {
                    self.next_token();
                    self.between_rest(expr, false)?
                }
                TokenKind::Keyword(Keyword::In) => {
                    let result = self.in_rest(expr)?;
                    if result == expr {
                        return Ok(expr);
                    }
                    result
                }
                TokenKind::Keyword(Keyword::Not) => match self.not_rest(expr)? {
                    Some(result) => result,
                    None => return Ok(expr),
                },
                TokenKind::Question => {
                    let outcome = hooks.relational_rest_ques(self, expr)?;
                    match self.resolve("relational_rest_ques", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::Bang => {
                    let outcome = hooks.relational_rest_bang(self, expr)?;
                    match self.resolve("relational_rest_bang", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::BitNot => {
                    let outcome = hooks.relational_rest_tilde(self, expr)?;
                    match self.resolve("relational_rest_tilde", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::TildeStar => {
                    let outcome = hooks.relational_rest_tilde_star(self, expr)?;
                    match self.resolve("relational_rest_tilde_star", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::BangTilde => {
                    let outcome = hooks.relational_rest_bang_tilde(self, expr)?;
                    match self.resolve("relational_rest_bang_tilde", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::BangTildeStar => {
                    let outcome = hooks.relational_rest_bang_tilde_star(self, expr)?;
                    match self.resolve("relational_rest_bang_tilde_star", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::TildeEq => {
                    let outcome = hooks.relational_rest_tilde_eq(self, expr)?;
                    match self.resolve("relational_rest_tilde_eq", outcome)? {
                        Some(result) => result,
                        None => return Ok(expr),
                    }
                }
                TokenKind::Identifier(_) => match self.identifier_operator(expr, false)? {
                    Some(result) => result,
                    None => return Ok(expr),
                },
                _ => return Ok(expr),
            }
        };
        self.relational_rest(result)
    }

    fn is_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        self.next_token();
        let not = self.eat_keyword(Keyword::Not);
        if self.eat_keyword(Keyword::Distinct) {
            self.accept_keyword(Keyword::From)?;
            let right = self.bit_or()?;
            let op = if not {
                BinaryOp::IsNotDistinctFrom
            } else {
                BinaryOp::IsDistinctFrom
            };
            return Ok(self.binary(op, expr, right));
        }
        let right = self.primary()?;
        let op = if not { BinaryOp::IsNot } else { BinaryOp::Is };
        Ok(self.binary(op, expr, right))
    }

    /// `LIKE`-style operator with an optional `ESCAPE` clause. The
    /// operator token is still current.
    fn like_rest(&mut self, expr: NodeId, op: BinaryOp) -> Result<NodeId> {
        self.next_token();
        let right = self.bit_or()?;
        let like = self.binary(op, expr, right);
        if self.eat_keyword(Keyword::Escape) {
            let escape = self.primary()?;
            return Ok(self.binary(BinaryOp::Escape, like, escape));
        }
        Ok(like)
    }

    /// `BETWEEN low AND high`, after `BETWEEN`.
    fn between_rest(&mut self, expr: NodeId, not: bool) -> Result<NodeId> {
        let start = self.span_start(expr);
        let low = self.relational()?;
        self.accept_keyword(Keyword::And)?;
        let high = self.relational()?;
        Ok(self.alloc(
            NodeKind::Between {
                expr,
                low,
                high,
                not,
            },
            start,
        ))
    }

    /// `NOT LIKE`, `NOT IN`, `NOT BETWEEN` and negated word operators.
    /// Returns `None`, with the cursor restored, for any other `NOT`.
    fn not_rest(&mut self, expr: NodeId) -> Result<Option<NodeId>> {
        let mark = self.mark();
        self.next_token();
        let negated = match self.kind() {
            TokenKind::Keyword(Keyword::Like) => BinaryOp::NotLike,
            TokenKind::Keyword(Keyword::ILike) => BinaryOp::NotILike,
            TokenKind::Keyword(Keyword::RLike) => BinaryOp::NotRLike,
            TokenKind::Identifier(_) if self.is_name(names::REGEXP) => BinaryOp::NotRegExp,
            TokenKind::Keyword(Keyword::Between) => {
                self.next_token();
                return self.between_rest(expr, true).map(Some);
            }
            TokenKind::Keyword(Keyword::In) => {
                self.reset(mark);
                let result = self.in_rest(expr)?;
                return Ok((result != expr).then_some(result));
            }
            TokenKind::Identifier(_) => {
                let result = self.identifier_operator(expr, true)?;
                if result.is_none() {
                    self.reset(mark);
                }
                return Ok(result);
            }
            _ => {
                self.reset(mark);
                return Ok(None);
            }
        };
        self.like_rest(expr, negated).map(Some)
    }

    /// Operators spelled as bare words: the dialect hook first, then
    /// `REGEXP`, `SOUNDS LIKE` and `SIMILAR TO`.
    fn identifier_operator(&mut self, expr: NodeId, negated: bool) -> Result<Option<NodeId>> {
        let Some(hash) = self.identifier_hash() else {
            return Ok(None);
        };
        let hooks = self.hooks();
        let outcome = hooks.relational_rest_identifier(self, expr, hash, negated)?;
        if let Some(result) = self.resolve("relational_rest_identifier", outcome)? {
            return Ok(Some(result));
        }

        if hash == names::GLOBAL && !negated {
            let result = self.in_rest(expr)?;
            return Ok((result != expr).then_some(result));
        }
        if hash == names::REGEXP && !negated {
            return self.like_rest(expr, BinaryOp::RegExp).map(Some);
        }
        if hash == names::SOUNDS && !negated {
            let mark = self.mark();
            self.next_token();
            if !self.eat_keyword(Keyword::Like) {
                self.reset(mark);
                return Ok(None);
            }
            let right = self.bit_or()?;
            return Ok(Some(self.binary(BinaryOp::SoundsLike, expr, right)));
        }
        if hash == names::SIMILAR {
            let mark = self.mark();
            self.next_token();
            if !self.eat_keyword(Keyword::To) {
                self.reset(mark);
                return Ok(None);
            }
            let right = self.bit_or()?;
            let op = if negated {
                BinaryOp::NotSimilarTo
            } else {
                BinaryOp::SimilarTo
            };
            return Ok(Some(self.binary(op, expr, right)));
        }
        Ok(None)
    }

    // ---- AND, XOR, OR --------------------------------------------------

    /// Parses an `AND`-level expression.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn and(&mut self) -> Result<NodeId> {
        let expr = self.relational()?;
        self.and_rest(expr)
    }

    /// Loops over `AND` and `&&`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn and_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        let hooks = self.hooks();
        self.logical_rest(expr, |p| match p.kind() {
            TokenKind::Keyword(Keyword::And) => Some(BinaryOp::BooleanAnd),
            TokenKind::AmpAmp => Some(hooks.and_rest_get_operator()),
            _ => None,
        }, Self::relational)
    }

    /// Loops over `XOR`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn xor_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        self.logical_rest(
            expr,
            |p| p.is_keyword(Keyword::Xor).then_some(BinaryOp::BooleanXor),
            Self::and,
        )
    }

    fn xor(&mut self) -> Result<NodeId> {
        let expr = self.and()?;
        self.xor_rest(expr)
    }

    /// Loops over `OR` and `||`.
    ///
    /// `||` only reaches this level when [`Feature::PipesAsConcat`] is
    /// off; the dialect decides what it means.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing operand.
    pub fn or_rest(&mut self, expr: NodeId) -> Result<NodeId> {
        let hooks = self.hooks();
        self.logical_rest(expr, |p| match p.kind() {
            TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::BooleanOr),
            TokenKind::Concat => Some(hooks.or_rest_get_operator()),
            _ => None,
        }, Self::xor)
    }

    /// Shared loop of the logical levels. With
    /// [`Feature::EnableBinaryOpGroup`], a run of three or more operands
    /// joined by the same operator becomes one group node.
    fn logical_rest(
        &mut self,
        expr: NodeId,
        op_at: impl Fn(&Self) -> Option<BinaryOp>,
        operand: fn(&mut Self) -> Result<NodeId>,
    ) -> Result<NodeId> {
        let group = self.is_enabled(Feature::EnableBinaryOpGroup);
        let start = self.span_start(expr);
        let mut expr = expr;
        let mut run: Vec<NodeId> = vec![expr];
        let mut run_op: Option<BinaryOp> = None;

        while let Some(op) = op_at(self) {
            self.next_token();
            let right = operand(self)?;
            if !group {
                expr = self.binary(op, expr, right);
                continue;
            }
            if run_op.is_some_and(|current| current != op) {
                expr = self.close_run(run_op, std::mem::take(&mut run), start);
                run.push(expr);
            }
            run_op = Some(op);
            run.push(right);
        }

        if group && run.len() > 1 {
            expr = self.close_run(run_op, run, start);
        }
        Ok(expr)
    }

    fn close_run(&mut self, op: Option<BinaryOp>, items: Vec<NodeId>, start: usize) -> NodeId {
        match (op, items.as_slice()) {
            (_, [single]) => *single,
            (Some(op), [left, right]) => self.binary(op, *left, *right),
            (Some(op), _) => self.alloc(NodeKind::BinaryGroup { op, items }, start),
            (None, _) => items[0],
        }
    }
}
