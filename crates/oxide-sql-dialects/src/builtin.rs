//! Built-in dispatch from a database type to its dialect.

use std::sync::Arc;

use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::dialect::{Dialect, GenericDialect};
use tracing::debug;

use crate::clickhouse::ClickHouseDialect;
use crate::hive::HiveDialect;
use crate::mysql::MySqlDialect;
use crate::postgres::PostgresDialect;
use crate::sqlite::SqliteDialect;

/// Grammar family a database type is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// [`MySqlDialect`].
    MySql,
    /// [`PostgresDialect`].
    Postgres,
    /// [`ClickHouseDialect`].
    ClickHouse,
    /// [`SqliteDialect`].
    Sqlite,
    /// [`HiveDialect`].
    Hive,
    /// [`GenericDialect`].
    Generic,
}

impl Family {
    /// Returns the family of `db_type`.
    #[must_use]
    pub const fn of(db_type: DbType) -> Self {
        match db_type {
            t if t.is_mysql_family() => Self::MySql,
            t if t.is_postgresql_db_style() => Self::Postgres,
            DbType::GaussDb | DbType::Redshift => Self::Postgres,
            DbType::ClickHouse => Self::ClickHouse,
            DbType::Sqlite => Self::Sqlite,
            DbType::Hive | DbType::Odps | DbType::Spark | DbType::Databricks => Self::Hive,
            _ => Self::Generic,
        }
    }

    /// Lower-case family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgresql",
            Self::ClickHouse => "clickhouse",
            Self::Sqlite => "sqlite",
            Self::Hive => "hive",
            Self::Generic => "generic",
        }
    }
}

/// Returns the built-in dialect for `db_type`.
///
/// Database types without a dedicated dialect get a [`GenericDialect`]
/// that keeps their identity.
#[must_use]
pub fn builtin_dialect(db_type: DbType) -> Arc<dyn Dialect> {
    let family = Family::of(db_type);
    let dialect: Arc<dyn Dialect> = match family {
        Family::MySql => Arc::new(MySqlDialect::new(db_type)),
        Family::Postgres => Arc::new(PostgresDialect::new(db_type)),
        Family::ClickHouse => Arc::new(ClickHouseDialect::new()),
        Family::Sqlite => Arc::new(SqliteDialect::new()),
        Family::Hive => Arc::new(HiveDialect::new(db_type)),
        Family::Generic => Arc::new(GenericDialect::new(db_type)),
    };
    debug!(db_type = db_type.name(), family = family.name(), "resolved built-in dialect");
    dialect
}

/// Resolves a dialect by name; unknown names get the generic dialect.
#[must_use]
pub fn dialect_for_name(name: &str) -> Arc<dyn Dialect> {
    builtin_dialect(DbType::of(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_sql_core::lexer::LexerConfig;

    #[test]
    fn test_families_dispatch() {
        assert_eq!(builtin_dialect(DbType::MariaDb).name(), "mariadb");
        assert!(builtin_dialect(DbType::TiDb).lexer_config().backtick_identifiers);
        assert!(builtin_dialect(DbType::Greenplum).lexer_config().dollar_quoted_strings);
        assert_eq!(builtin_dialect(DbType::Spark).db_type(), DbType::Spark);
        assert!(builtin_dialect(DbType::Sqlite).lexer_config().bracket_identifiers);
    }

    #[test]
    fn test_family_names() {
        assert_eq!(Family::of(DbType::Redshift), Family::Postgres);
        assert_eq!(Family::of(DbType::Databricks).name(), "hive");
        assert_eq!(Family::of(DbType::Oracle), Family::Generic);
    }

    #[test]
    fn test_unknown_types_stay_generic() {
        let dialect = builtin_dialect(DbType::Oracle);
        assert_eq!(dialect.db_type(), DbType::Oracle);
        assert_eq!(dialect.lexer_config(), LexerConfig::ANSI);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(dialect_for_name("MySQL").db_type(), DbType::MySql);
        assert_eq!(dialect_for_name("antspark").db_type(), DbType::Spark);
        assert_eq!(dialect_for_name("no-such-db").db_type(), DbType::Other);
    }
}
