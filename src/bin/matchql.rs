//! matchql: compile query documents to SQL
//!
//! # Usage
//!
//! ```bash
//! # Show the generated SQL and its parameters
//! matchql compile books.json
//!
//! # Same, for SQLite, as JSON
//! matchql compile books.toml --dialect sqlite --format json
//!
//! # Cache key of the document's criteria
//! matchql fingerprint books.json
//!
//! # Execute against a database
//! matchql run books.json --database-url sqlite://books.db
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use matchql::prelude::*;

#[derive(Parser)]
#[command(name = "matchql")]
#[command(version)]
#[command(about = "Compile predicate documents to parameterized SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    matchql compile books.json
    matchql compile books.toml --dialect sqlite --format json
    matchql fingerprint books.json
    matchql run books.json --database-url sqlite://books.db")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to <config dir>/matchql/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query document and print the SQL and parameters
    Compile {
        /// Query document (.json or .toml)
        document: PathBuf,

        /// SQL dialect (mysql, sqlite)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the fingerprint of a document's criteria
    Fingerprint {
        /// Query document (.json or .toml)
        document: PathBuf,
    },
    /// Execute a query document and print the rows as JSON
    Run {
        /// Query document (.json or .toml)
        document: PathBuf,

        /// SQL dialect (mysql, sqlite)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Database connection URL
        #[arg(long, env = "MATCHQL_DATABASE_URL")]
        database_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "matchql=debug" } else { "matchql=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match &cli.command {
        Commands::Compile {
            document,
            dialect,
            format,
        } => compile_document(document, dialect.unwrap_or(config.dialect), *format),
        Commands::Fingerprint { document } => {
            let doc = load(document)?;
            println!("{}", doc.criteria()?.fingerprint());
            Ok(())
        }
        Commands::Run {
            document,
            dialect,
            database_url,
        } => {
            let url = database_url
                .clone()
                .or_else(|| config.database_url.clone())
                .context("No database URL. Use --database-url or set MATCHQL_DATABASE_URL")?;
            run_document(document, dialect.unwrap_or(config.dialect), &url).await
        }
    }
}

fn load(path: &Path) -> Result<QueryDocument> {
    QueryDocument::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn compile_document(path: &Path, dialect: Dialect, format: OutputFormat) -> Result<()> {
    let doc = load(path)?;
    let criteria = doc.criteria()?;
    let stmt = doc.to_query()?.build(dialect, &criteria)?;
    let sql = stmt.to_sql();
    let params = stmt.params();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "dialect": dialect.to_string(),
                "sql": sql,
                "params": params,
                "fingerprint": criteria.fingerprint(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", "Generated SQL:".green().bold());
            println!("  {}", sql.white());

            if !params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (i, param) in params.iter().enumerate() {
                    println!("  ?{} = {}", i + 1, param.to_string().yellow());
                }
            }

            println!();
            println!("{} {}", "Fingerprint:".dimmed(), criteria.fingerprint());
        }
    }

    Ok(())
}

async fn run_document(path: &Path, dialect: Dialect, url: &str) -> Result<()> {
    let doc = load(path)?;
    let query = doc.to_query()?;
    let criteria = doc.criteria()?;

    let repo = Repository::connect(url, dialect, doc.source.as_str())
        .await
        .context("Connection failed")?;
    let rows = repo.find(&query, &criteria).await?;

    if rows.is_empty() {
        eprintln!("{}", "(no results)".dimmed());
    }
    println!("{}", serde_json::to_string_pretty(&rows)?);
    eprintln!("{} row(s) returned", rows.len().to_string().cyan());

    Ok(())
}
