//! Generic SQL dialect.

use std::sync::LazyLock;

use super::{AggregateTable, Dialect};
use crate::dbtype::DbType;

/// Aggregates every dialect understands.
pub static GENERIC_AGGREGATES: LazyLock<AggregateTable> =
    LazyLock::new(|| AggregateTable::new(&["AVG", "COUNT", "MAX", "MIN", "STDDEV", "SUM"]));

/// A dialect with only the base grammar.
///
/// Used for every [`DbType`] without a dedicated dialect; it keeps the
/// database type it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericDialect {
    db_type: DbType,
}

impl GenericDialect {
    /// Creates a generic dialect for `db_type`.
    #[must_use]
    pub const fn new(db_type: DbType) -> Self {
        Self { db_type }
    }
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new(DbType::Other)
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        self.db_type.name()
    }

    fn db_type(&self) -> DbType {
        self.db_type
    }
}
