//! Dialect identity.
//!
//! A [`DbType`] names a SQL dialect. Each one carries a single-bit mask so
//! that dialect families can be tested with one `&`, and a stable 64-bit
//! hash of its canonical (lower-cased) name. Legacy dialects that the
//! parser never specialises share the mask `0`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::hash::fnv1a_64_lower;

macro_rules! db_types {
    ($($variant:ident => $name:literal, $mask:expr;)*) => {
        /// A SQL dialect identity.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum DbType {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl DbType {
            /// Every dialect, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the canonical name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Returns the family bit of this dialect (0 for legacy entries).
            #[must_use]
            pub const fn mask(self) -> u64 {
                match self {
                    $(Self::$variant => $mask,)*
                }
            }

            /// Returns the FNV-1a hash of the lower-cased canonical name.
            #[must_use]
            pub const fn hash_code_64(self) -> u64 {
                match self {
                    $(Self::$variant => fnv1a_64_lower($name),)*
                }
            }
        }
    };
}

db_types! {
    Other => "other", 1 << 0;
    Jtds => "jtds", 1 << 1;
    Hsql => "hsql", 1 << 2;
    Db2 => "db2", 1 << 3;
    PostgreSql => "postgresql", 1 << 4;
    SqlServer => "sqlserver", 1 << 5;
    Oracle => "oracle", 1 << 6;
    MySql => "mysql", 1 << 7;
    MariaDb => "mariadb", 1 << 8;
    Derby => "derby", 1 << 9;
    Hive => "hive", 1 << 10;
    H2 => "h2", 1 << 11;
    Dm => "dm", 1 << 12;
    Kingbase => "kingbase", 1 << 13;
    Gbase => "gbase", 1 << 14;
    OceanBase => "oceanbase", 1 << 15;
    Informix => "informix", 1 << 16;
    Odps => "odps", 1 << 17;
    Teradata => "teradata", 1 << 18;
    Phoenix => "phoenix", 1 << 19;
    Edb => "edb", 1 << 20;
    Kylin => "kylin", 1 << 21;
    Sqlite => "sqlite", 1 << 22;
    Ads => "ads", 1 << 23;
    Presto => "presto", 1 << 24;
    ElasticSearch => "elastic_search", 1 << 25;
    HBase => "hbase", 1 << 26;
    Drds => "drds", 1 << 27;
    ClickHouse => "clickhouse", 1 << 28;
    Blink => "blink", 1 << 29;
    Spark => "spark", 1 << 30;
    OceanBaseOracle => "oceanbase_oracle", 1 << 31;
    PolarDb => "polardb", 1 << 32;
    AliOracle => "ali_oracle", 1 << 33;
    Mock => "mock", 1 << 34;
    Sybase => "sybase", 1 << 35;
    Highgo => "highgo", 1 << 36;
    Greenplum => "greenplum", 1 << 37;
    GaussDb => "gaussdb", 1 << 38;
    Trino => "trino", 1 << 39;
    Oscar => "oscar", 1 << 40;
    TiDb => "tidb", 1 << 41;
    TyDb => "tydb", 1 << 42;
    StarRocks => "starrocks", 1 << 43;
    GoldenDb => "goldendb", 1 << 44;
    Snowflake => "snowflake", 1 << 45;
    Redshift => "redshift", 1 << 46;
    Hologres => "hologres", 1 << 47;
    BigQuery => "bigquery", 1 << 48;
    Impala => "impala", 1 << 49;
    Doris => "doris", 1 << 50;
    Lealone => "lealone", 1 << 51;
    Athena => "athena", 1 << 52;
    PolarDbX => "polardbx", 1 << 53;
    SuperSql => "supersql", 1 << 54;
    Databricks => "databricks", 1 << 55;
    AdbMySql => "adb_mysql", 1 << 56;
    PolarDb2 => "polardb2", 1 << 57;
    Synapse => "synapse", 1 << 58;
    Ingres => "ingres", 0;
    Cloudscape => "cloudscape", 0;
    TimesTen => "timesten", 0;
    As400 => "as400", 0;
    SapDb => "sapdb", 0;
    Kdb => "kdb", 0;
    Log4jdbc => "log4jdbc", 0;
    Xugu => "xugu", 0;
    FirebirdSql => "firebirdsql", 0;
    JsqlConnect => "JSQLConnect", 0;
    JTurbo => "JTurbo", 0;
    Interbase => "interbase", 0;
    Pointbase => "pointbase", 0;
    Edbc => "edbc", 0;
    Mimer => "mimer", 0;
    TaosData => "taosdata", 0;
    SunDb => "sundb", 0;
}

/// Error returned by the strict [`FromStr`] implementation of [`DbType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect '{0}'")]
pub struct UnknownDbType(pub String);

impl DbType {
    /// Resolves a dialect name leniently.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// The aliases `maxcompute`, `aliyun_ads` and `antspark` are
    /// accepted. Unknown or empty names resolve to [`DbType::Other`].
    #[must_use]
    pub fn of(name: &str) -> Self {
        Self::lookup(name).unwrap_or(Self::Other)
    }

    fn lookup(name: &str) -> Option<Self> {
        let hash = fnv1a_64_lower(name.trim());
        match hash {
            h if h == fnv1a_64_lower("maxcompute") => Some(Self::Odps),
            h if h == fnv1a_64_lower("aliyun_ads") => Some(Self::Ads),
            h if h == fnv1a_64_lower("antspark") => Some(Self::Spark),
            h => Self::ALL.iter().copied().find(|t| t.hash_code_64() == h),
        }
    }

    /// Unions the masks of `types`.
    #[must_use]
    pub fn of_types(types: &[Self]) -> u64 {
        types.iter().fold(0, |acc, t| acc | t.mask())
    }

    /// Returns true if this dialect's bit is set in `mask`.
    #[must_use]
    pub const fn is_in(self, mask: u64) -> bool {
        self.mask() & mask != 0
    }

    /// PostgreSQL and the dialects that share its grammar.
    #[must_use]
    pub const fn is_postgresql_db_style(self) -> bool {
        matches!(
            self,
            Self::PostgreSql | Self::Edb | Self::Greenplum | Self::Hologres
        )
    }

    /// MySQL and its wire/grammar compatible derivatives.
    #[must_use]
    pub const fn is_mysql_family(self) -> bool {
        matches!(
            self,
            Self::MySql
                | Self::MariaDb
                | Self::TiDb
                | Self::GoldenDb
                | Self::OceanBase
                | Self::Drds
                | Self::PolarDbX
                | Self::ElasticSearch
                | Self::AdbMySql
                | Self::Ads
        )
    }
}

impl FromStr for DbType {
    type Err = UnknownDbType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownDbType(s.to_string()))
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DbType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
