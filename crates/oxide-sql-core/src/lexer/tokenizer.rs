//! SQL Tokenizer implementation.

use tracing::trace;

use super::{Keyword, LexerConfig, Span, Token, TokenKind};
use crate::feature::{Feature, Features};

/// A snapshot of the lexer cursor, taken by [`Lexer::mark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    offset: usize,
    token: Token,
    line: u32,
    line_start: usize,
    prev_end: usize,
    comment_count: usize,
}

impl Mark {
    /// Byte offset of the scanner when the mark was taken.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The current token when the mark was taken.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }
}

/// A lexer that tokenizes SQL input.
///
/// The lexer keeps one current token. [`Lexer::next_token`] replaces it
/// with the following token; [`Lexer::mark`] and [`Lexer::reset`] save and
/// restore the complete cursor so a parser can try an alternative and
/// back out.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// 1-based line of `pos`.
    line: u32,
    /// Byte offset of the first character of the current line.
    line_start: usize,
    /// Line and column of `start`.
    start_line: u32,
    start_column: u32,
    /// The current token.
    token: Token,
    /// End offset of the previous token.
    prev_end: usize,
    config: LexerConfig,
    features: Features,
    comments: Vec<String>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer with ANSI lexical rules.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, LexerConfig::ANSI, Features::empty())
    }

    /// Creates a new lexer with the given lexical rules and features.
    ///
    /// No token is scanned yet: the current token is `Eof` until the
    /// first call to [`Lexer::next_token`].
    #[must_use]
    pub fn with_config(input: &'a str, config: LexerConfig, features: Features) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            line: 1,
            line_start: 0,
            start_line: 1,
            start_column: 1,
            token: Token::at(TokenKind::Eof, Span::new(0, 0), 1, 1),
            prev_end: 0,
            config,
            features,
            comments: Vec::new(),
        }
    }

    /// Returns the input text.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the current token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Returns the lexical configuration.
    #[must_use]
    pub const fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Returns the enabled features.
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// End offset of the token before the current one.
    #[must_use]
    pub const fn prev_end(&self) -> usize {
        self.prev_end
    }

    /// Comments recorded so far (only with [`Feature::KeepComments`]).
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Removes and returns the recorded comments.
    pub fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.comments)
    }

    /// Snapshots the cursor.
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            token: self.token.clone(),
            line: self.line,
            line_start: self.line_start,
            prev_end: self.prev_end,
            comment_count: self.comments.len(),
        }
    }

    /// Restores the cursor to `mark`.
    pub fn reset(&mut self, mark: Mark) {
        trace!(offset = mark.offset, "lexer reset");
        self.pos = mark.offset;
        self.start = mark.token.span.start;
        self.token = mark.token;
        self.line = mark.line;
        self.line_start = mark.line_start;
        self.prev_end = mark.prev_end;
        self.comments.truncate(mark.comment_count);
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Returns the character `n` positions ahead without advancing.
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    /// Advances if the current character is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn record_comment(&mut self, from: usize) {
        if self.features.is_enabled(Feature::KeepComments) {
            let text = self.input[from..self.pos].trim_end();
            self.comments.push(text.to_string());
        }
    }

    /// Skips whitespace and comments.
    ///
    /// Returns an error message for an unterminated block comment.
    fn skip_whitespace_and_comments(&mut self) -> Option<&'static str> {
        loop {
            // Skip whitespace
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            let from = self.pos;

            // Single-line comments (-- ... or # ...)
            let dash_dash = self.peek() == Some('-') && self.peek_next() == Some('-');
            let hash = self.config.hash_comments && self.peek() == Some('#');
            if dash_dash || hash {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                self.record_comment(from);
                continue;
            }

            // Multi-line comments (/* ... */)
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => return Some("unterminated block comment"),
                        _ => {}
                    }
                }
                self.record_comment(from);
                continue;
            }

            return None;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::at(kind, self.make_span(), self.start_line, self.start_column)
    }

    /// Records `pos` as the start of the next token.
    fn begin_token(&mut self) {
        self.start = self.pos;
        self.start_line = self.line;
        let column = self.input[self.line_start..self.pos].chars().count() + 1;
        self.start_column = u32::try_from(column).unwrap_or(u32::MAX);
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    fn is_identifier_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$'
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(Self::is_identifier_char) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];

        // Check if it's a keyword
        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(text.to_string()))
        }
    }

    /// Scans a quoted identifier, keeping its quotes.
    fn scan_quoted_identifier(&mut self, close: char) -> Token {
        self.advance(); // consume opening quote

        loop {
            match self.advance() {
                Some(c) if c == close => {
                    // A doubled quote is part of the name.
                    if close != ']' && self.peek() == Some(close) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {}
                None => return self.error("unclosed quoted identifier"),
            }
        }

        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Identifier(text.to_string()))
    }

    /// Scans a number (integer, float or `BD` decimal).
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('0') && matches!(self.peek_next(), Some('x' | 'X')) {
            let digits_start = self.pos + 2;
            if self
                .input
                .get(digits_start..)
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_hexdigit())
            {
                self.advance();
                self.advance();
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.advance();
                }
                let digits = &self.input[digits_start..self.pos];
                return self.make_token(TokenKind::Hex(digits.to_string()));
            }
        }

        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // Check for decimal point
        if self.peek() == Some('.') && self.peek_next() != Some('.') {
            let after_dot = self.peek_next();
            if after_dot.is_none_or(|c| c.is_ascii_digit() || !Self::is_identifier_char(c)) {
                is_float = true;
                self.advance(); // consume .
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        // Check for exponent
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let sign = matches!(self.peek_next(), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.advance(); // consume e/E
                if sign {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text = &self.input[self.start..self.pos];

        if matches!(self.peek(), Some('B' | 'b')) && matches!(self.peek_next(), Some('D' | 'd')) {
            let after = self.peek_nth(2);
            if after.is_none_or(|c| !Self::is_identifier_char(c)) {
                let text = text.to_string();
                self.advance();
                self.advance();
                return self.make_token(TokenKind::Decimal(text));
            }
        }

        if is_float {
            return self.make_token(TokenKind::Float(text.to_string()));
        }
        match text.parse::<i128>() {
            Ok(i) => self.make_token(TokenKind::Integer(i)),
            Err(_) => self.make_token(TokenKind::Float(text.to_string())),
        }
    }

    /// Scans a quoted literal body after the opening quote.
    ///
    /// Doubled quotes always stand for one quote. Backslash escapes are
    /// decoded when `escapes` is set.
    fn scan_quoted_body(&mut self, quote: char, escapes: bool) -> Result<String, &'static str> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        return Ok(value);
                    }
                }
                Some('\\') if escapes => self.scan_escape(&mut value)?,
                Some(c) => value.push(c),
                None => return Err("unclosed str."),
            }
        }
    }

    fn scan_escape(&mut self, value: &mut String) -> Result<(), &'static str> {
        let Some(c) = self.advance() else {
            return Err("unclosed str.");
        };
        match c {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            '0' => value.push('\0'),
            'b' => value.push('\u{8}'),
            'Z' => value.push('\u{1a}'),
            '%' | '_' => {
                value.push('\\');
                value.push(c);
            }
            '\\' if self.features.is_enabled(Feature::ScanStringDoubleBackslash) => {
                value.push_str("\\\\");
            }
            'u' if self.features.is_enabled(Feature::SupportUnicodeCodePoint) => {
                let hex = self.input.get(self.pos..self.pos + 4).unwrap_or_default();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        value.push(ch);
                        self.pos += 4;
                    }
                    None => return Err("illegal unicode escape"),
                }
            }
            other => value.push(other),
        }
        Ok(())
    }

    /// Scans a string literal starting at the opening quote.
    fn scan_string(&mut self, quote: char, escapes: bool, national: bool) -> Token {
        self.advance(); // consume opening quote
        match self.scan_quoted_body(quote, escapes) {
            Ok(value) if national => self.make_token(TokenKind::NString(value)),
            Ok(value) => self.make_token(TokenKind::String(value)),
            Err(message) => self.error(message),
        }
    }

    /// Scans `X'..'` or `B'..'` after the prefix letter.
    fn scan_prefixed_digits(&mut self, hex: bool) -> Token {
        self.advance(); // consume opening quote
        let digits_start = self.pos;
        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if hex && c.is_ascii_hexdigit() => {}
                Some('0' | '1') if !hex => {}
                Some(_) => {
                    let kind = if hex { "hex" } else { "bit" };
                    return self.error(format!("illegal {kind} literal"));
                }
                None => return self.error("unclosed str."),
            }
        }
        let digits = self.input[digits_start..self.pos - 1].to_string();
        if hex {
            self.make_token(TokenKind::Hex(digits))
        } else {
            self.make_token(TokenKind::Bits(digits))
        }
    }

    /// Scans `$1` parameters and `$tag$ .. $tag$` strings.
    fn scan_dollar(&mut self) -> Token {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            let text = &self.input[self.start..self.pos];
            return self.make_token(TokenKind::Variable(text.to_string()));
        }

        if self.config.dollar_quoted_strings {
            let tag_start = self.pos;
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            if self.eat('$') {
                let tag = &self.input[self.start..self.pos];
                let body_start = self.pos;
                return match self.input[body_start..].find(tag) {
                    Some(len) => {
                        let body = self.input[body_start..body_start + len].to_string();
                        while self.pos < body_start + len + tag.len() {
                            self.advance();
                        }
                        self.make_token(TokenKind::String(body))
                    }
                    None => {
                        while self.advance().is_some() {}
                        self.error("unclosed str.")
                    }
                };
            }
            self.pos = tag_start;
        }

        self.error("illegal char $")
    }

    /// Scans `@var`, `@@var`, `@@`, `@>`.
    fn scan_at(&mut self) -> Token {
        if self.eat('>') {
            return self.make_token(TokenKind::AtGt);
        }
        let double = self.eat('@');
        let named = self
            .peek()
            .is_some_and(|c| Self::is_identifier_char(c) || matches!(c, '\'' | '"' | '`'));
        if !named {
            return if double {
                self.make_token(TokenKind::AtAt)
            } else {
                self.error("illegal char @")
            };
        }
        match self.peek() {
            Some(q @ ('\'' | '"' | '`')) => {
                self.advance();
                while self.peek().is_some_and(|c| c != q) {
                    self.advance();
                }
                if !self.eat(q) {
                    return self.error("unclosed str.");
                }
            }
            _ => {
                while self
                    .peek()
                    .is_some_and(|c| Self::is_identifier_char(c) || c == '.')
                {
                    self.advance();
                }
            }
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Variable(text.to_string()))
    }

    /// Returns true if a `.` at the current position starts a number.
    fn dot_starts_number(&self) -> bool {
        let after_word = matches!(
            self.token.kind,
            TokenKind::Identifier(_) | TokenKind::RightParen | TokenKind::RightBracket
        ) && self.token.span.end == self.start;
        !after_word && self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    /// Scans the next token and makes it the current token.
    pub fn next_token(&mut self) -> &Token {
        self.prev_end = self.token.span.end;
        self.token = self.scan();
        &self.token
    }

    /// Scans one token from the current position.
    #[allow(clippy::too_many_lines)]
    fn scan(&mut self) -> Token {
        let comment_error = self.skip_whitespace_and_comments();
        self.begin_token();
        if let Some(message) = comment_error {
            return self.error(message);
        }

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        let kind = match c {
            // Single-character tokens
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            '[' => {
                let starts_name = self.config.bracket_identifiers
                    && self.peek().is_some_and(|c| c.is_alphabetic() || c == '_');
                if starts_name {
                    self.pos = self.start;
                    return self.scan_quoted_identifier(']');
                }
                TokenKind::LeftBracket
            }
            '.' => {
                if self.dot_starts_number() {
                    self.pos = self.start;
                    return self.scan_number();
                }
                TokenKind::Dot
            }
            '-' => {
                if self.eat('>') {
                    if self.eat('>') {
                        TokenKind::DoubleArrow
                    } else {
                        TokenKind::Arrow
                    }
                } else {
                    TokenKind::Minus
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '<' => {
                if self.eat('=') {
                    if self.eat('>') {
                        TokenKind::LtEqGt
                    } else {
                        TokenKind::LtEq
                    }
                } else if self.eat('>') {
                    TokenKind::LtGt
                } else if self.eat('<') {
                    TokenKind::LeftShift
                } else if self.eat('@') {
                    TokenKind::LtAt
                } else if self.peek() == Some('-') && self.peek_next() == Some('>') {
                    self.advance();
                    self.advance();
                    TokenKind::LtDashGt
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else if self.eat('>') {
                    if self.eat('>') {
                        TokenKind::UnsignedRightShift
                    } else {
                        TokenKind::RightShift
                    }
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else if self.eat('<') {
                    TokenKind::NotLt
                } else if self.eat('>') {
                    TokenKind::NotGt
                } else if self.eat('!') {
                    TokenKind::BangBang
                } else if self.eat('~') {
                    if self.eat('*') {
                        TokenKind::BangTildeStar
                    } else {
                        TokenKind::BangTilde
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Concat
                } else {
                    TokenKind::BitOr
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AmpAmp
                } else {
                    TokenKind::BitAnd
                }
            }
            '~' => {
                if self.eat('*') {
                    TokenKind::TildeStar
                } else if self.eat('=') {
                    TokenKind::TildeEq
                } else {
                    TokenKind::BitNot
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            '#' => {
                if self.eat('>') {
                    if self.eat('>') {
                        TokenKind::PoundGtGt
                    } else {
                        TokenKind::PoundGt
                    }
                } else {
                    TokenKind::Pound
                }
            }
            ':' => {
                if self.eat(':') {
                    TokenKind::DoubleColon
                } else if self.eat('=') {
                    TokenKind::ColonEq
                } else {
                    TokenKind::Colon
                }
            }
            '?' => {
                let json = self.config.json_operators;
                if json && self.peek() == Some('?') && self.peek_next() == Some('|') {
                    self.advance();
                    self.advance();
                    TokenKind::QuesQuesBar
                } else if json && self.eat('?') {
                    TokenKind::QuesQues
                } else if json && self.eat('|') {
                    TokenKind::QuesBar
                } else if json && self.eat('&') {
                    TokenKind::QuesAmp
                } else {
                    TokenKind::Question
                }
            }
            '@' => return self.scan_at(),
            '$' => return self.scan_dollar(),

            // String literals
            '\'' => {
                self.pos = self.start;
                return self.scan_string('\'', self.config.backslash_escapes, false);
            }

            // Double quotes: string or identifier depending on the dialect
            '"' => {
                self.pos = self.start;
                if self.config.double_quoted_strings {
                    return self.scan_string('"', self.config.backslash_escapes, false);
                }
                return self.scan_quoted_identifier('"');
            }
            '`' if self.config.backtick_identifiers => {
                self.pos = self.start;
                return self.scan_quoted_identifier('`');
            }

            // Prefixed literals
            'N' | 'n' if self.peek() == Some('\'') => {
                return self.scan_string('\'', self.config.backslash_escapes, true);
            }
            'X' | 'x' if self.peek() == Some('\'') => return self.scan_prefixed_digits(true),
            'B' | 'b' if self.peek() == Some('\'') => return self.scan_prefixed_digits(false),
            'E' | 'e' if self.config.escape_strings && self.peek() == Some('\'') => {
                return self.scan_string('\'', true, false);
            }

            // Numbers
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                return self.scan_number();
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => {
                self.pos = self.start;
                return self.scan_identifier();
            }

            _ => return self.error(format!("illegal char {c}")),
        };
        self.make_token(kind)
    }

    /// Tokenizes the rest of the input and returns all tokens, ending with
    /// `Eof` or the first error token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token().clone();
            let done = matches!(token.kind, TokenKind::Eof | TokenKind::Error(_));
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn kinds_with(input: &str, config: LexerConfig, features: Features) -> Vec<TokenKind> {
        Lexer::with_config(input, config, features)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn string(s: &str) -> TokenKind {
        TokenKind::String(String::from(s))
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
    }

    #[test]
    fn test_whitespace_only() {
        let tokens = tokenize("   \n\t  ");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            token_kinds("SELECT -- comment\nFROM /* block */ WHERE"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_kept() {
        let features = Features::from(Feature::KeepComments);
        let mut lexer = Lexer::with_config("-- head\nSELECT /* mid */ 1", LexerConfig::ANSI, features);
        let _ = lexer.tokenize();
        assert_eq!(lexer.comments(), ["-- head", "/* mid */"]);
    }

    #[test]
    fn test_hash_comments() {
        let config = LexerConfig {
            hash_comments: true,
            ..LexerConfig::ANSI
        };
        assert_eq!(
            kinds_with("1 # note\n2", config, Features::empty()),
            vec![TokenKind::Integer(1), TokenKind::Integer(2), TokenKind::Eof]
        );
        assert_eq!(
            token_kinds("a #> b"),
            vec![
                TokenKind::Identifier(String::from("a")),
                TokenKind::PoundGt,
                TokenKind::Identifier(String::from("b")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let kinds = token_kinds("SELECT /* never closed");
        assert!(matches!(kinds[1], TokenKind::Error(_)));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz _qux natural"),
            vec![
                TokenKind::Identifier(String::from("foo")),
                TokenKind::Identifier(String::from("bar_baz")),
                TokenKind::Identifier(String::from("_qux")),
                TokenKind::Identifier(String::from("natural")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers_keep_quotes() {
        assert_eq!(
            token_kinds("\"col\".x"),
            vec![
                TokenKind::Identifier(String::from("\"col\"")),
                TokenKind::Dot,
                TokenKind::Identifier(String::from("x")),
                TokenKind::Eof,
            ]
        );
        let config = LexerConfig {
            backtick_identifiers: true,
            bracket_identifiers: true,
            ..LexerConfig::ANSI
        };
        assert_eq!(
            kinds_with("`a b` [c d]", config, Features::empty()),
            vec![
                TokenKind::Identifier(String::from("`a b`")),
                TokenKind::Identifier(String::from("[c d]")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 3.14 .5 1e3 2.5BD 0x1F 9223372036854775808"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(String::from("3.14")),
                TokenKind::Float(String::from(".5")),
                TokenKind::Float(String::from("1e3")),
                TokenKind::Decimal(String::from("2.5")),
                TokenKind::Hex(String::from("1F")),
                TokenKind::Integer(9_223_372_036_854_775_808),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_qualified_number_is_not_float() {
        assert_eq!(
            token_kinds("t.1"),
            vec![
                TokenKind::Identifier(String::from("t")),
                TokenKind::Dot,
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'hello' 'it''s' N'nat' X'0A' B'101'"),
            vec![
                string("hello"),
                string("it's"),
                TokenKind::NString(String::from("nat")),
                TokenKind::Hex(String::from("0A")),
                TokenKind::Bits(String::from("101")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_backslash_escapes() {
        let config = LexerConfig {
            backslash_escapes: true,
            double_quoted_strings: true,
            ..LexerConfig::ANSI
        };
        assert_eq!(
            kinds_with(r"'a\nb' 'q\'t' 'p\%' '\\' 'x\Zy' 'c\_d'", config, Features::empty()),
            vec![
                string("a\nb"),
                string("q't"),
                string("p\\%"),
                string("\\"),
                string("x\u{1a}y"),
                string("c\\_d"),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds_with(r#""say \"hi\"""#, config, Features::empty()),
            vec![string("say \"hi\""), TokenKind::Eof]
        );
    }

    #[test]
    fn test_backslash_escape_features() {
        let config = LexerConfig {
            backslash_escapes: true,
            ..LexerConfig::ANSI
        };
        let unicode = Features::from(Feature::SupportUnicodeCodePoint);
        assert_eq!(
            kinds_with(r"'\u00e9'", config, unicode),
            vec![string("\u{e9}"), TokenKind::Eof]
        );
        let double = Features::from(Feature::ScanStringDoubleBackslash);
        assert_eq!(
            kinds_with(r"'a\\b'", config, double),
            vec![string("a\\\\b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unclosed_string() {
        let kinds = token_kinds("SELECT 'abc");
        assert_eq!(kinds[1], TokenKind::Error(String::from("unclosed str.")));
    }

    #[test]
    fn test_standard_prefixes_ignore_config() {
        // N, X and B prefixes are standard; only E'' depends on the dialect.
        assert_eq!(
            kinds_with("n'x' X'0f' b'01' E'a'", LexerConfig::ANSI, Features::empty()),
            vec![
                TokenKind::NString(String::from("x")),
                TokenKind::Hex(String::from("0f")),
                TokenKind::Bits(String::from("01")),
                TokenKind::Identifier(String::from("E")),
                string("a"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escape_and_dollar_strings() {
        let config = LexerConfig {
            escape_strings: true,
            dollar_quoted_strings: true,
            ..LexerConfig::ANSI
        };
        assert_eq!(
            kinds_with(r"E'a\tb' $$x'y$$ $fn$body$fn$ $1", config, Features::empty()),
            vec![
                string("a\tb"),
                string("x'y"),
                string("body"),
                TokenKind::Variable(String::from("$1")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            token_kinds("@x @@session.y ? :"),
            vec![
                TokenKind::Variable(String::from("@x")),
                TokenKind::Variable(String::from("@@session.y")),
                TokenKind::Question,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("<=> <> != !< !> !! !~* ~* ~= ^= -> ->> #>> <-> @> <@ @@ := :: && >>>"),
            vec![
                TokenKind::LtEqGt,
                TokenKind::LtGt,
                TokenKind::NotEq,
                TokenKind::NotLt,
                TokenKind::NotGt,
                TokenKind::BangBang,
                TokenKind::BangTildeStar,
                TokenKind::TildeStar,
                TokenKind::TildeEq,
                TokenKind::CaretEq,
                TokenKind::Arrow,
                TokenKind::DoubleArrow,
                TokenKind::PoundGtGt,
                TokenKind::LtDashGt,
                TokenKind::AtGt,
                TokenKind::LtAt,
                TokenKind::AtAt,
                TokenKind::ColonEq,
                TokenKind::DoubleColon,
                TokenKind::AmpAmp,
                TokenKind::UnsignedRightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_json_operators_gated() {
        let config = LexerConfig {
            json_operators: true,
            ..LexerConfig::ANSI
        };
        assert_eq!(
            kinds_with("?? ?| ??| ?&", config, Features::empty()),
            vec![
                TokenKind::QuesQues,
                TokenKind::QuesBar,
                TokenKind::QuesQuesBar,
                TokenKind::QuesAmp,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            token_kinds("??"),
            vec![TokenKind::Question, TokenKind::Question, TokenKind::Eof]
        );
    }

    #[test]
    fn test_line_and_column() {
        let tokens = tokenize("SELECT\n  a,\n\tb");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[3].line, tokens[3].column), (3, 2));
    }

    #[test]
    fn test_mark_reset_restores_cursor() {
        let mut lexer = Lexer::new("a IN (1, 2)");
        lexer.next_token();
        lexer.next_token();
        let mark = lexer.mark();
        let before = lexer.token().clone();
        lexer.next_token();
        lexer.next_token();
        lexer.reset(mark.clone());
        assert_eq!(lexer.token(), &before);
        assert_eq!(lexer.mark(), mark);
        assert_eq!(lexer.next_token().kind, TokenKind::LeftParen);
    }

    #[test]
    fn test_illegal_character() {
        let kinds = token_kinds("a ` b");
        assert_eq!(kinds[1], TokenKind::Error(String::from("illegal char `")));
    }
}
