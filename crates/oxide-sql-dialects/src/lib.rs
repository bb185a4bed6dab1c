//! # oxide-sql-dialects
//!
//! Database dialects for `oxide-sql-core` and a registry that lets
//! callers plug in their own.
//!
//! | Dialect | Database types | Notable grammar |
//! |---|---|---|
//! | [`MySqlDialect`] | MySQL, MariaDB, TiDB, OceanBase, ... | `BINARY x`, `MATCH .. AGAINST`, `_utf8'..'`, `GROUP_CONCAT(.. SEPARATOR ..)` |
//! | [`PostgresDialect`] | PostgreSQL, Greenplum, EDB, Hologres, Redshift, ... | `x::T`, `~*`, `?`, `$$..$$`, `E'..'`, `INT[]` |
//! | [`ClickHouseDialect`] | ClickHouse | `quantile(0.5)(x)`, `x::T` |
//! | [`SqliteDialect`] | SQLite | `GLOB`, `MATCH`, `[name]` |
//! | [`HiveDialect`] | Hive, ODPS, Spark, Databricks | `LATERAL VIEW` |
//!
//! Every other database type parses with the core generic grammar.
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_core::{DbType, Features};
//! use oxide_sql_dialects::ProviderRegistry;
//!
//! let mut parser = ProviderRegistry::global().create_statement_parser(
//!     DbType::PostgreSql,
//!     "SELECT payload::jsonb FROM events WHERE name ~* '^a'",
//!     Features::empty(),
//! );
//! let statements = parser.parse_statement_list().unwrap();
//! assert_eq!(statements.len(), 1);
//! ```

pub mod builtin;
pub mod clickhouse;
pub mod error;
pub mod hive;
pub mod mysql;
pub mod postgres;
pub mod registry;
pub mod sqlite;
mod support;

pub use builtin::{Family, builtin_dialect, dialect_for_name};
pub use clickhouse::ClickHouseDialect;
pub use error::RegistryError;
pub use hive::HiveDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use registry::{DialectProvider, ProviderRegistry};
pub use sqlite::SqliteDialect;
