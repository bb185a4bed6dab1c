//! SQL dialect support.
//!
//! A [`Dialect`] is a strategy object handed to the parser. It supplies
//! lexical rules, default features and an aggregate-name table, and it may
//! override any of the grammar hooks. Each hook is called at one fixed
//! point of the precedence ladder and answers with a [`HookOutcome`]:
//!
//! - [`HookOutcome::Handled`]: the dialect consumed the construct.
//! - [`HookOutcome::NotApplicable`]: the construct is not the dialect's
//!   business. The hook must not have moved the cursor; the parser
//!   continues with its own rule.
//! - [`HookOutcome::Unsupported`]: the dialect rejects the construct. The
//!   parser raises [`SqlError::Unsupported`](crate::parser::SqlError).
//!
//! Every hook defaults to `NotApplicable`, so a dialect overrides only the
//! junctures it cares about.

mod generic;

use std::fmt;

use crate::ast::{BinaryOp, NodeId, StringStyle};
use crate::dbtype::DbType;
use crate::feature::{Feature, Features};
use crate::hash::fnv1a_64_lower;
use crate::lexer::LexerConfig;
use crate::parser::{AggregateCall, DataTypeSpec, ExprParser, Result};

pub use generic::{GENERIC_AGGREGATES, GenericDialect};

/// Answer of a dialect hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome<T> {
    /// The dialect parsed the construct.
    Handled(T),
    /// Not this dialect's construct; the cursor is untouched.
    NotApplicable,
    /// The dialect forbids the construct.
    Unsupported(String),
}

impl<T> HookOutcome<T> {
    /// Returns true for [`HookOutcome::Handled`].
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Result of a dialect hook: a parse error or a [`HookOutcome`].
pub type HookResult<T> = Result<HookOutcome<T>>;

/// Case-insensitive set of aggregate function names.
///
/// Lookups hash the lower-cased name with FNV-1a and binary-search a
/// sorted hash array.
#[derive(Clone)]
pub struct AggregateTable {
    entries: Vec<(u64, &'static str)>,
}

impl AggregateTable {
    /// Builds a table from names in any case.
    #[must_use]
    pub fn new(names: &[&'static str]) -> Self {
        let mut entries: Vec<(u64, &'static str)> = names
            .iter()
            .map(|name| (fnv1a_64_lower(name), *name))
            .collect();
        entries.sort_unstable_by_key(|(hash, _)| *hash);
        Self { entries }
    }

    /// Returns a table with the names of `self` and `extra`.
    #[must_use]
    pub fn extend(&self, extra: &[&'static str]) -> Self {
        let mut names: Vec<&'static str> = self.names().collect();
        names.extend_from_slice(extra);
        Self::new(&names)
    }

    /// Looks up a pre-computed lower-case hash.
    #[must_use]
    pub fn contains(&self, hash: u64) -> bool {
        self.entries
            .binary_search_by_key(&hash, |(h, _)| *h)
            .is_ok()
    }

    /// Looks up a name, ignoring case.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.contains(fnv1a_64_lower(name))
    }

    /// Iterates the names in hash order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, name)| *name)
    }

    /// Returns the number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns pairs of distinct names whose hashes collide.
    #[must_use]
    pub fn collisions(&self) -> Vec<(&'static str, &'static str)> {
        self.entries
            .windows(2)
            .filter(|w| w[0].0 == w[1].0 && !w[0].1.eq_ignore_ascii_case(w[1].1))
            .map(|w| (w[0].1, w[1].1))
            .collect()
    }
}

impl fmt::Debug for AggregateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Dialect-specific behaviour of the parser.
///
/// Hooks receive the parser itself and may use its public grammar
/// methods ([`ExprParser::expr`], [`ExprParser::primary`],
/// [`ExprParser::data_type`], ...) to parse sub-constructs.
#[allow(unused_variables)]
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the database type this dialect parses.
    fn db_type(&self) -> DbType;

    /// Lexical rules.
    fn lexer_config(&self) -> LexerConfig {
        LexerConfig::ANSI
    }

    /// Features always enabled for this dialect.
    fn default_features(&self) -> Features {
        Features::of(&[Feature::PipesAsConcat])
    }

    /// Names parsed as aggregate calls rather than plain method calls.
    fn aggregate_functions(&self) -> &AggregateTable {
        &GENERIC_AGGREGATES
    }

    /// How the printer escapes strings for this dialect.
    fn string_style(&self) -> StringStyle {
        StringStyle::Standard
    }

    /// Called first in `primary`, with the cursor on the first token.
    fn primary_prefix(&self, p: &mut ExprParser<'_>) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called in `primary` for tokens no base rule accepts, such as
    /// statement keywords. `NotApplicable` becomes a syntax error.
    fn primary_common(&self, p: &mut ExprParser<'_>) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called after a bare identifier `name` has been consumed.
    fn primary_identifier_rest(
        &self,
        p: &mut ExprParser<'_>,
        name: &str,
        hash: u64,
        start: usize,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called after a string literal has been consumed.
    fn primary_literal_chars_rest(
        &self,
        p: &mut ExprParser<'_>,
        literal: NodeId,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called before each round of postfix parsing on `expr`.
    fn primary_rest(&self, p: &mut ExprParser<'_>, expr: NodeId) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called after `INTERVAL` has been consumed, unless `INTERVAL` is
    /// used as a plain name.
    fn parse_interval(&self, p: &mut ExprParser<'_>, start: usize) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called after a data type and its parameters have been parsed.
    fn parse_data_type_rest(
        &self,
        p: &mut ExprParser<'_>,
        spec: &mut DataTypeSpec,
    ) -> HookResult<()> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left ? right`
    fn relational_rest_ques(&self, p: &mut ExprParser<'_>, left: NodeId) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left ! right`
    fn relational_rest_bang(&self, p: &mut ExprParser<'_>, left: NodeId) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left == right`. `NotApplicable` parses a plain `==` comparison.
    fn relational_rest_eqeq(&self, p: &mut ExprParser<'_>, left: NodeId) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left ~ right`
    fn relational_rest_tilde(&self, p: &mut ExprParser<'_>, left: NodeId) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left ~* right`
    fn relational_rest_tilde_star(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left !~ right`
    fn relational_rest_bang_tilde(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left !~* right`
    fn relational_rest_bang_tilde_star(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left ~= right`
    fn relational_rest_tilde_eq(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// `left [NOT] word right` for an identifier operator such as `GLOB`.
    /// When `negated` is set, `NOT` has already been consumed.
    fn relational_rest_identifier(
        &self,
        p: &mut ExprParser<'_>,
        left: NodeId,
        hash: u64,
        negated: bool,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called for `name(` before generic call parsing, with the cursor on
    /// the `(`.
    fn method_rest_allow_identifier_method_specific(
        &self,
        p: &mut ExprParser<'_>,
        name: &str,
        hash: u64,
        start: usize,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called inside an aggregate call after its arguments and `ORDER BY`.
    fn aggregate_args_rest(
        &self,
        p: &mut ExprParser<'_>,
        call: &mut AggregateCall,
    ) -> HookResult<()> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Called after a table source and its alias.
    fn parse_table_source_rest(
        &self,
        p: &mut ExprParser<'_>,
        source: NodeId,
    ) -> HookResult<NodeId> {
        Ok(HookOutcome::NotApplicable)
    }

    /// Operator built for `&&`.
    fn and_rest_get_operator(&self) -> BinaryOp {
        BinaryOp::BooleanAnd
    }

    /// Operator built for `||` when it reaches the `OR` level.
    fn or_rest_get_operator(&self) -> BinaryOp {
        BinaryOp::Concat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_table_lookup() {
        let table = AggregateTable::new(&["COUNT", "sum", "Group_Concat"]);
        assert!(table.contains_name("count"));
        assert!(table.contains_name("GROUP_CONCAT"));
        assert!(table.contains(fnv1a_64_lower("SUM")));
        assert!(!table.contains_name("concat"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_aggregate_table_extend() {
        let table = GENERIC_AGGREGATES.extend(&["ROW_NUMBER"]);
        assert!(table.contains_name("row_number"));
        assert!(table.contains_name("avg"));
        assert!(!GENERIC_AGGREGATES.contains_name("row_number"));
    }

    #[test]
    fn test_generic_aggregates_have_no_collisions() {
        assert!(GENERIC_AGGREGATES.collisions().is_empty());
    }

    #[test]
    fn test_hook_outcome() {
        assert!(HookOutcome::Handled(1).is_handled());
        assert!(!HookOutcome::<u8>::NotApplicable.is_handled());
        assert!(!HookOutcome::<u8>::Unsupported(String::from("x")).is_handled());
    }
}
