//! Pluggable dialect providers.
//!
//! A [`DialectProvider`] overrides how parsers and lexers are created for
//! one dialect key. The [`ProviderRegistry`] maps keys to providers in a
//! sharded concurrent map, so registration, lookup and removal can run
//! from any thread; a lookup racing a registration sees either the old or
//! the new provider.
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_sql_core::{DbType, Features};
//! use oxide_sql_dialects::{DialectProvider, ProviderRegistry};
//!
//! #[derive(Debug)]
//! struct Passthrough;
//! impl DialectProvider for Passthrough {}
//!
//! let registry = ProviderRegistry::new();
//! registry.register_provider("mysql", Arc::new(Passthrough)).unwrap();
//! // Every factory of `Passthrough` returns `None`, so the built-in
//! // MySQL parser is used.
//! let parser = registry.create_statement_parser(DbType::MySql, "SELECT 1", Features::empty());
//! assert_eq!(parser.expr_parser().dialect().name(), "mysql");
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::feature::Features;
use oxide_sql_core::lexer::Lexer;
use oxide_sql_core::parser::{ExprParser, StatementParser};
use tracing::{debug, info, warn};

use crate::builtin::builtin_dialect;
use crate::error::{RegistryError, Result};

/// Factories for one dialect. Each returns `None` to fall through to the
/// built-in dialect.
#[allow(unused_variables)]
pub trait DialectProvider: Send + Sync + fmt::Debug {
    /// Creates a statement parser over `sql`.
    fn create_statement_parser<'a>(
        &self,
        sql: &'a str,
        db_type: DbType,
        features: Features,
    ) -> Option<StatementParser<'a>> {
        None
    }

    /// Creates an expression parser over `sql`.
    fn create_expr_parser<'a>(
        &self,
        sql: &'a str,
        db_type: DbType,
        features: Features,
    ) -> Option<ExprParser<'a>> {
        None
    }

    /// Creates a lexer over `sql`.
    fn create_lexer<'a>(
        &self,
        sql: &'a str,
        db_type: DbType,
        features: Features,
    ) -> Option<Lexer<'a>> {
        None
    }
}

static GLOBAL: LazyLock<ProviderRegistry> = LazyLock::new(ProviderRegistry::new);

/// Concurrent map from dialect key to provider.
///
/// Keys are trimmed and lower-cased. A registry can be created per test
/// or shared through [`ProviderRegistry::global`].
#[derive(Default)]
pub struct ProviderRegistry {
    providers: DashMap<String, Arc<dyn DialectProvider>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers `provider` for `key` and returns the provider it
    /// replaces.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BlankKey`] if `key` is empty or only
    /// whitespace.
    pub fn register_provider(
        &self,
        key: &str,
        provider: Arc<dyn DialectProvider>,
    ) -> Result<Option<Arc<dyn DialectProvider>>> {
        let key = normalize(key);
        if key.is_empty() {
            return Err(RegistryError::BlankKey);
        }
        let previous = self.providers.insert(key.clone(), provider);
        if previous.is_some() {
            warn!(key = %key, "replaced dialect provider");
        } else {
            info!(key = %key, "registered dialect provider");
        }
        Ok(previous)
    }

    /// Removes the provider for `key` and returns it.
    pub fn unregister_provider(&self, key: &str) -> Option<Arc<dyn DialectProvider>> {
        let key = normalize(key);
        let removed = self.providers.remove(&key).map(|(_, provider)| provider);
        if removed.is_some() {
            info!(key = %key, "unregistered dialect provider");
        }
        removed
    }

    /// Returns the provider registered for `key`.
    #[must_use]
    pub fn lookup_provider(&self, key: &str) -> Option<Arc<dyn DialectProvider>> {
        // Clone out of the shard so no lock is held while the provider runs.
        self.providers
            .get(&normalize(key))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Creates a statement parser for `db_type`: the registered
    /// provider's if it returns one, else the built-in parser.
    #[must_use]
    pub fn create_statement_parser<'a>(
        &self,
        db_type: DbType,
        sql: &'a str,
        features: Features,
    ) -> StatementParser<'a> {
        if let Some(parser) = self
            .lookup_provider(db_type.name())
            .and_then(|provider| provider.create_statement_parser(sql, db_type, features))
        {
            debug!(db_type = db_type.name(), "statement parser from provider");
            return parser;
        }
        StatementParser::new(sql, builtin_dialect(db_type), features)
    }

    /// Creates an expression parser for `db_type`, provider first.
    #[must_use]
    pub fn create_expr_parser<'a>(
        &self,
        db_type: DbType,
        sql: &'a str,
        features: Features,
    ) -> ExprParser<'a> {
        if let Some(parser) = self
            .lookup_provider(db_type.name())
            .and_then(|provider| provider.create_expr_parser(sql, db_type, features))
        {
            debug!(db_type = db_type.name(), "expression parser from provider");
            return parser;
        }
        ExprParser::new(sql, builtin_dialect(db_type), features)
    }

    /// Creates a lexer for `db_type`, provider first.
    #[must_use]
    pub fn create_lexer<'a>(&self, db_type: DbType, sql: &'a str, features: Features) -> Lexer<'a> {
        if let Some(lexer) = self
            .lookup_provider(db_type.name())
            .and_then(|provider| provider.create_lexer(sql, db_type, features))
        {
            debug!(db_type = db_type.name(), "lexer from provider");
            return lexer;
        }
        let dialect = builtin_dialect(db_type);
        let features = dialect.default_features().union(features);
        Lexer::with_config(sql, dialect.lexer_config(), features)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use oxide_sql_core::dialect::GenericDialect;

    /// Parses every dialect key with the generic grammar.
    #[derive(Debug)]
    struct GenericProvider;

    impl DialectProvider for GenericProvider {
        fn create_statement_parser<'a>(
            &self,
            sql: &'a str,
            db_type: DbType,
            features: Features,
        ) -> Option<StatementParser<'a>> {
            Some(StatementParser::new(
                sql,
                Arc::new(GenericDialect::new(db_type)),
                features,
            ))
        }
    }

    #[derive(Debug)]
    struct EmptyProvider;

    impl DialectProvider for EmptyProvider {}

    fn is_generic(parser: &StatementParser<'_>) -> bool {
        !parser.expr_parser().lexer().config().backtick_identifiers
    }

    #[test]
    fn test_register_lookup_unregister() {
        let registry = ProviderRegistry::new();
        assert!(registry.lookup_provider("mysql").is_none());

        let first = registry
            .register_provider(" MySQL ", Arc::new(GenericProvider))
            .unwrap();
        assert!(first.is_none());
        assert!(registry.lookup_provider("mysql").is_some());
        assert_eq!(registry.keys(), vec!["mysql"]);

        let replaced = registry
            .register_provider("mysql", Arc::new(EmptyProvider))
            .unwrap();
        assert!(replaced.is_some());

        assert!(registry.unregister_provider("MYSQL").is_some());
        assert!(registry.unregister_provider("mysql").is_none());
        assert!(registry.keys().is_empty());
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let registry = ProviderRegistry::new();
        let err = registry
            .register_provider("  ", Arc::new(EmptyProvider))
            .unwrap_err();
        assert_eq!(err, RegistryError::BlankKey);
    }

    #[test]
    fn test_provider_overrides_then_falls_back() {
        let registry = ProviderRegistry::new();
        registry
            .register_provider("mysql", Arc::new(GenericProvider))
            .unwrap();
        let parser = registry.create_statement_parser(DbType::MySql, "SELECT 1", Features::empty());
        assert!(is_generic(&parser));

        registry.unregister_provider("mysql");
        let parser = registry.create_statement_parser(DbType::MySql, "SELECT 1", Features::empty());
        assert!(!is_generic(&parser));
        assert_eq!(parser.expr_parser().dialect().name(), "mysql");
    }

    #[test]
    fn test_none_factory_falls_through() {
        let registry = ProviderRegistry::new();
        registry
            .register_provider("postgresql", Arc::new(EmptyProvider))
            .unwrap();
        let lexer = registry.create_lexer(DbType::PostgreSql, "$$x$$", Features::empty());
        assert!(lexer.config().dollar_quoted_strings);
        let parser = registry.create_expr_parser(DbType::PostgreSql, "a", Features::empty());
        assert_eq!(parser.dialect().db_type(), DbType::PostgreSql);
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        let registry = ProviderRegistry::new();
        thread::scope(|s| {
            for i in 0..4 {
                let registry = &registry;
                s.spawn(move || {
                    for round in 0..200 {
                        let key = format!("dialect{}", (i + round) % 8);
                        registry
                            .register_provider(&key, Arc::new(GenericProvider))
                            .unwrap();
                        let parser = registry.create_statement_parser(
                            DbType::MySql,
                            "SELECT 1",
                            Features::empty(),
                        );
                        assert!(parser.expr_parser().token().is_keyword());
                        registry.unregister_provider(&key);
                    }
                });
            }
            for _ in 0..2 {
                let registry = &registry;
                s.spawn(move || {
                    for _ in 0..400 {
                        if let Some(provider) = registry.lookup_provider("dialect3") {
                            let parser = provider.create_statement_parser(
                                "SELECT 1",
                                DbType::Other,
                                Features::empty(),
                            );
                            assert!(parser.is_some());
                        }
                    }
                });
            }
        });
        assert!(registry.keys().len() <= 8);
    }
}
