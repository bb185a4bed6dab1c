//! oxide-sql CLI
//!
//! Tokenizes and parses SQL in any supported dialect.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use oxide_sql_cli::{Options, OutputFormat, dialects, expr, parse, read_input, tables, tokens};
use oxide_sql_core::{DbType, Features};

/// Multi-dialect SQL parser.
#[derive(Parser)]
#[command(name = "oxide-sql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect name, e.g. mysql, postgresql, hive. Unknown names parse
    /// with the generic grammar.
    #[arg(short, long, env = "OXIDE_SQL_DIALECT", default_value = "other")]
    dialect: String,

    /// Comma-separated parser features added to the dialect defaults.
    #[arg(short, long, env = "OXIDE_SQL_FEATURES", default_value = "")]
    features: Features,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// SQL taken from the argument or from a file.
#[derive(clap::Args)]
struct Input {
    /// SQL text.
    sql: Option<String>,

    /// Read SQL from this file instead.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream.
    Tokens(Input),

    /// Parse a single expression.
    Expr(Input),

    /// Parse `;`-separated statements.
    Parse(Input),

    /// List the tables referenced by the statements.
    Tables(Input),

    /// List the known dialects.
    Dialects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = Options {
        db_type: DbType::of(&cli.dialect),
        features: cli.features,
        format: cli.format,
    };
    debug!(dialect = %options.db_type, features = ?options.features, "options resolved");

    let output = match cli.command {
        Commands::Tokens(input) => tokens(&read_input(input.sql, input.file.as_deref())?, &options)?,
        Commands::Expr(input) => expr(&read_input(input.sql, input.file.as_deref())?, &options)?,
        Commands::Parse(input) => parse(&read_input(input.sql, input.file.as_deref())?, &options)?,
        Commands::Tables(input) => tables(&read_input(input.sql, input.file.as_deref())?, &options)?,
        Commands::Dialects => dialects(options.format)?,
    };
    print!("{output}");
    if options.format == OutputFormat::Json {
        println!();
    }

    Ok(())
}
