//! Command implementations behind the `oxide-sql` binary.
//!
//! Every command takes the SQL text and a set of [`Options`] and returns
//! the text to print, so the binary stays a thin argument parser.
//!
//! ```bash
//! # Token stream of a MySQL statement
//! oxide-sql -d mysql tokens "SELECT \`a\` FROM t # note"
//!
//! # Expression tree as JSON
//! oxide-sql -d postgresql --format json expr "payload::jsonb ? 'k'"
//!
//! # Tables referenced by a file of statements
//! oxide-sql -d hive tables --file queries.sql
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use oxide_sql_core::ast::{Ast, NodeId, StringStyle, TreeDump};
use oxide_sql_core::dbtype::DbType;
use oxide_sql_core::feature::Features;
use oxide_sql_core::lexer::{Span, Token};
use oxide_sql_core::visitor::TableCollector;
use oxide_sql_dialects::{Family, ProviderRegistry};
use serde::Serialize;
use tracing::debug;

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Settings shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Dialect to parse with.
    pub db_type: DbType,
    /// Features added to the dialect defaults.
    pub features: Features,
    /// Output encoding.
    pub format: OutputFormat,
}

/// One token of a `tokens` dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    /// Token class, e.g. `IDENTIFIER`.
    pub kind: &'static str,
    /// Source text.
    pub text: String,
    /// Byte range.
    pub span: Span,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind.name(),
            text: token.text(),
            span: token.span,
            line: token.line,
            column: token.column,
        }
    }
}

#[derive(Serialize)]
struct ParsedRecord {
    sql: String,
    tree: TreeDump,
}

#[derive(Serialize)]
struct DialectRecord {
    name: &'static str,
    family: &'static str,
}

/// Returns the SQL text from the positional argument or from `file`.
///
/// # Errors
///
/// Fails if both or neither source is given, or the file can't be read.
pub fn read_input(sql: Option<String>, file: Option<&Path>) -> Result<String> {
    match (sql, file) {
        (Some(sql), None) => Ok(sql),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        (Some(_), Some(_)) => bail!("give either SQL text or --file, not both"),
        (None, None) => bail!("no SQL given; pass it as an argument or with --file"),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to encode JSON")
}

/// Lists the tokens of `sql`, ending with `EOF` or the first error.
///
/// # Errors
///
/// Fails only if JSON encoding fails.
pub fn tokens(sql: &str, options: &Options) -> Result<String> {
    let mut lexer = ProviderRegistry::global().create_lexer(options.db_type, sql, options.features);
    let records: Vec<TokenRecord> = lexer.tokenize().iter().map(TokenRecord::from).collect();
    debug!(count = records.len(), "tokenized");
    match options.format {
        OutputFormat::Json => to_json(&records),
        OutputFormat::Text => {
            let mut out = String::new();
            for record in &records {
                let _ = writeln!(
                    out,
                    "{}:{}\t{}\t{}",
                    record.line, record.column, record.kind, record.text
                );
            }
            Ok(out)
        }
    }
}

fn render(ast: &Ast, roots: &[NodeId], style: StringStyle, format: OutputFormat) -> Result<String> {
    let records: Vec<ParsedRecord> = roots
        .iter()
        .map(|&root| ParsedRecord {
            sql: ast.to_sql_with(root, style),
            tree: ast.dump(root),
        })
        .collect();
    match format {
        OutputFormat::Json => to_json(&records),
        OutputFormat::Text => {
            let mut out = String::new();
            for record in &records {
                let _ = writeln!(out, "{}", record.sql);
                out.push_str(&record.tree.render());
            }
            Ok(out)
        }
    }
}

/// Parses one expression and prints it with its tree.
///
/// # Errors
///
/// Returns the parse error.
pub fn expr(sql: &str, options: &Options) -> Result<String> {
    let mut parser =
        ProviderRegistry::global().create_expr_parser(options.db_type, sql, options.features);
    let style = parser.dialect().string_style();
    let root = parser.expr()?;
    parser.expect_eof()?;
    let ast = parser.into_ast();
    render(&ast, &[root], style, options.format)
}

/// Parses a statement list and prints each statement with its tree.
///
/// # Errors
///
/// Returns the first parse error.
pub fn parse(sql: &str, options: &Options) -> Result<String> {
    let mut parser =
        ProviderRegistry::global().create_statement_parser(options.db_type, sql, options.features);
    let style = parser.expr_parser().dialect().string_style();
    let statements = parser.parse_statement_list()?;
    let ast = parser.into_ast();
    render(&ast, &statements, style, options.format)
}

/// Lists the tables referenced by every statement, deduplicated in
/// first-seen order.
///
/// # Errors
///
/// Returns the first parse error.
pub fn tables(sql: &str, options: &Options) -> Result<String> {
    let mut parser =
        ProviderRegistry::global().create_statement_parser(options.db_type, sql, options.features);
    let statements = parser.parse_statement_list()?;
    let ast = parser.into_ast();

    let mut names: Vec<String> = Vec::new();
    for &statement in &statements {
        for name in TableCollector::collect(&ast, statement) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    match options.format {
        OutputFormat::Json => to_json(&names),
        OutputFormat::Text => Ok(names.iter().map(|n| format!("{n}\n")).collect()),
    }
}

/// Lists every database type with the grammar family that parses it.
///
/// # Errors
///
/// Fails only if JSON encoding fails.
pub fn dialects(format: OutputFormat) -> Result<String> {
    let records: Vec<DialectRecord> = DbType::ALL
        .iter()
        .map(|&db_type| DialectRecord {
            name: db_type.name(),
            family: Family::of(db_type).name(),
        })
        .collect();
    match format {
        OutputFormat::Json => to_json(&records),
        OutputFormat::Text => {
            let mut out = String::new();
            for record in &records {
                let _ = writeln!(out, "{}\t{}", record.name, record.family);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(db_type: DbType, format: OutputFormat) -> Options {
        Options {
            db_type,
            features: Features::empty(),
            format,
        }
    }

    #[test]
    fn test_tokens_text() {
        let out = tokens("SELECT a", &options(DbType::Other, OutputFormat::Text)).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1:1\t"));
        assert!(lines[1].ends_with("\tIDENTIFIER\ta"));
    }

    #[test]
    fn test_tokens_json_uses_dialect_lexer() {
        let out = tokens("`a`", &options(DbType::MySql, OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["kind"], "IDENTIFIER");
        assert_eq!(value[0]["text"], "`a`");
        assert_eq!(value[0]["span"]["end"], 3);
    }

    #[test]
    fn test_expr_text() {
        let out = expr("a + 1", &options(DbType::Other, OutputFormat::Text)).unwrap();
        assert_eq!(out, "a + 1\nBinary +\n  Identifier a\n  Integer 1\n");
    }

    #[test]
    fn test_expr_error_is_reported() {
        let err = expr("a +", &options(DbType::Other, OutputFormat::Text)).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_json() {
        let out = parse("SELECT 1; SELECT 2", &options(DbType::Other, OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["sql"], "SELECT 2");
    }

    #[test]
    fn test_tables_dedup() {
        let out = tables(
            "SELECT * FROM a JOIN b ON a.id = b.id; SELECT * FROM a",
            &options(DbType::Other, OutputFormat::Text),
        )
        .unwrap();
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn test_read_input_sources() {
        assert_eq!(read_input(Some("SELECT 1".into()), None).unwrap(), "SELECT 1");
        assert!(read_input(None, None).is_err());
        assert!(read_input(Some("x".into()), Some(Path::new("q.sql"))).is_err());
    }

    #[test]
    fn test_dialects_lists_every_type() {
        let out = dialects(OutputFormat::Text).unwrap();
        assert_eq!(out.lines().count(), DbType::ALL.len());
        assert!(out.lines().any(|l| l == "mariadb\tmysql"));
    }
}
