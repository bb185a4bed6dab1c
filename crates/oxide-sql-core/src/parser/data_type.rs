//! Data type names as used by `CAST`, `::` and `ARRAY<T>`.

use super::{ExprParser, Result};
use crate::ast::{NodeId, NodeKind};
use crate::hash::names;
use crate::lexer::{Keyword, TokenKind};

/// A data type under construction, handed to
/// [`Dialect::parse_data_type_rest`](crate::dialect::Dialect::parse_data_type_rest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeSpec {
    /// Type name; multi-word names are joined by single spaces.
    pub name: String,
    /// `(10, 2)` parameters.
    pub args: Vec<NodeId>,
    /// `<..>` parameters.
    pub type_args: Vec<NodeId>,
    /// Trailing words such as `UNSIGNED`; `[]` for array suffixes.
    pub modifiers: Vec<String>,
}

impl DataTypeSpec {
    /// Creates a bare type name.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            args: Vec::new(),
            type_args: Vec::new(),
            modifiers: Vec::new(),
        }
    }
}

impl ExprParser<'_> {
    /// Parses a data type.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor is not on a type name or a
    /// parameter list is malformed.
    pub fn data_type(&mut self) -> Result<NodeId> {
        let start = self.start();
        let hash = self.identifier_hash();
        let is_interval = self.is_keyword(Keyword::Interval);
        let name = self.word()?.to_ascii_uppercase();
        let mut spec = DataTypeSpec::new(name);

        match hash {
            Some(names::ARRAY) if self.eat(&TokenKind::Lt) => {
                spec.type_args.push(self.data_type()?);
                self.expect_gt()?;
            }
            Some(names::MAP) if self.eat(&TokenKind::Lt) => {
                spec.type_args.push(self.data_type()?);
                self.accept(&TokenKind::Comma)?;
                spec.type_args.push(self.data_type()?);
                self.expect_gt()?;
            }
            Some(names::MAP) if self.eat(&TokenKind::LeftParen) => {
                spec.type_args.push(self.data_type()?);
                self.accept(&TokenKind::Comma)?;
                spec.type_args.push(self.data_type()?);
                self.accept(&TokenKind::RightParen)?;
            }
            Some(names::STRUCT) if self.eat(&TokenKind::Lt) => {
                loop {
                    spec.type_args.push(self.struct_field()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_gt()?;
            }
            Some(names::DOUBLE) if self.eat_name(names::PRECISION) => {
                spec.name.push_str(" PRECISION");
            }
            Some(names::CHARACTER) if self.eat_name(names::VARYING) => {
                spec.name.push_str(" VARYING");
            }
            Some(names::NATIONAL) if self.is_name(names::CHAR) || self.is_name(names::CHARACTER) => {
                let word = self.word()?.to_ascii_uppercase();
                spec.name.push(' ');
                spec.name.push_str(&word);
                if self.eat_name(names::VARYING) {
                    spec.name.push_str(" VARYING");
                }
            }
            Some(names::SIGNED | names::UNSIGNED)
                if matches!(self.kind(), TokenKind::Identifier(_)) =>
            {
                let word = self.word()?.to_ascii_uppercase();
                spec.name.push(' ');
                spec.name.push_str(&word);
            }
            _ => {}
        }

        if is_interval && matches!(self.kind(), TokenKind::Identifier(_)) {
            let unit = self.interval_unit()?;
            spec.modifiers.push(unit);
        } else if spec.type_args.is_empty() && self.is(&TokenKind::LeftParen) {
            spec.args = self.paren_expr_list()?;
        }

        self.data_type_modifiers(&mut spec)?;

        let hooks = self.hooks();
        let outcome = hooks.parse_data_type_rest(self, &mut spec)?;
        self.resolve("parse_data_type_rest", outcome)?;

        let DataTypeSpec {
            name,
            args,
            type_args,
            modifiers,
        } = spec;
        Ok(self.alloc(
            NodeKind::DataType {
                name,
                args,
                type_args,
                modifiers,
            },
            start,
        ))
    }

    fn data_type_modifiers(&mut self, spec: &mut DataTypeSpec) -> Result<()> {
        loop {
            if self.eat_name(names::UNSIGNED) {
                spec.modifiers.push(String::from("UNSIGNED"));
            } else if self.eat_name(names::ZEROFILL) {
                spec.modifiers.push(String::from("ZEROFILL"));
            } else if self.eat_name(names::BINARY) {
                spec.modifiers.push(String::from("BINARY"));
            } else if self.is_keyword(Keyword::With) || self.is_name(names::WITHOUT) {
                let mark = self.mark();
                let with = self.is_keyword(Keyword::With);
                self.next_token();
                if self.eat_name(names::TIME) && self.eat_name(names::ZONE) {
                    spec.modifiers.push(String::from(if with {
                        "WITH TIME ZONE"
                    } else {
                        "WITHOUT TIME ZONE"
                    }));
                } else {
                    self.reset(mark);
                    return Ok(());
                }
            } else if self.is_name(names::CHARACTER) || self.is_name(names::CHARSET) {
                let charset_word = self.is_name(names::CHARSET);
                self.next_token();
                if !charset_word {
                    self.accept_keyword(Keyword::Set)?;
                }
                let charset = self.word()?;
                spec.modifiers.push(format!("CHARACTER SET {charset}"));
            } else if self.eat_name(names::COLLATE) {
                let collation = self.collation()?;
                spec.modifiers.push(format!("COLLATE {collation}"));
            } else {
                return Ok(());
            }
        }
    }

    /// `name [:] type` inside `STRUCT<..>`.
    fn struct_field(&mut self) -> Result<NodeId> {
        let start = self.start();
        let name = self.word()?;
        self.eat(&TokenKind::Colon);
        let data_type = self.data_type()?;
        Ok(self.alloc(NodeKind::StructField { name, data_type }, start))
    }

    /// Consumes one `>` closing a type parameter list. A `>>` or `>>>`
    /// token closes several nested lists, one call each.
    pub(crate) fn accept_gt(&mut self) -> bool {
        if self.pending_gt > 0 {
            self.pending_gt -= 1;
            if self.pending_gt == 0 {
                self.next_token();
            }
            return true;
        }
        match self.kind() {
            TokenKind::Gt => {
                self.next_token();
                true
            }
            TokenKind::RightShift => {
                self.pending_gt = 1;
                true
            }
            TokenKind::UnsignedRightShift => {
                self.pending_gt = 2;
                true
            }
            _ => false,
        }
    }

    fn expect_gt(&mut self) -> Result<()> {
        if self.accept_gt() {
            Ok(())
        } else {
            Err(self.unexpected("GT"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dialect::GenericDialect;
    use crate::feature::Features;

    fn data_type(sql: &str) -> String {
        let mut parser =
            ExprParser::new(sql, Arc::new(GenericDialect::default()), Features::empty());
        let id = parser.data_type().unwrap();
        parser.expect_eof().unwrap();
        parser.ast().to_sql(id)
    }

    #[test]
    fn test_simple_types() {
        assert_eq!(data_type("int"), "INT");
        assert_eq!(data_type("decimal(10, 2)"), "DECIMAL(10, 2)");
        assert_eq!(data_type("double precision"), "DOUBLE PRECISION");
        assert_eq!(data_type("character varying(20)"), "CHARACTER VARYING(20)");
        assert_eq!(data_type("national char(3)"), "NATIONAL CHAR(3)");
        assert_eq!(data_type("signed integer"), "SIGNED INTEGER");
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(data_type("int(11) unsigned zerofill"), "INT(11) UNSIGNED ZEROFILL");
        assert_eq!(
            data_type("timestamp with time zone"),
            "TIMESTAMP WITH TIME ZONE"
        );
        assert_eq!(
            data_type("varchar(10) charset utf8 collate utf8_bin"),
            "VARCHAR(10) CHARACTER SET utf8 COLLATE utf8_bin"
        );
        assert_eq!(data_type("interval day to second"), "INTERVAL DAY TO SECOND");
    }

    #[test]
    fn test_nested_generic_types() {
        assert_eq!(data_type("array<array<int>>"), "ARRAY<ARRAY<INT>>");
        assert_eq!(
            data_type("array<array<array<int>>>"),
            "ARRAY<ARRAY<ARRAY<INT>>>"
        );
        assert_eq!(data_type("map<string, array<int>>"), "MAP<STRING, ARRAY<INT>>");
        assert_eq!(
            data_type("struct<a: int, b string>"),
            "STRUCT<a: INT, b: STRING>"
        );
    }

    #[test]
    fn test_missing_gt() {
        let mut parser = ExprParser::new(
            "array<int",
            Arc::new(GenericDialect::default()),
            Features::empty(),
        );
        let err = parser.data_type().unwrap_err();
        assert!(err.message().contains("expect GT"));
    }
}
