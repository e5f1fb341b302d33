//! Pricevault CLI
//!
//! Command-line interface for Pricevault operations:
//! - Run a range query against the store
//! - Fetch a single object by key
//! - Print a default config file

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

use pricevault::config::{generate_default_config, Config};
use pricevault::retrieval::{normalize_naive, ObjectFetcher, PriceQuery, RetrievalOrchestrator, Table};
use pricevault::store::{ConfiguredStoreProvider, Credentials, StoreProvider};

#[derive(Parser)]
#[command(name = "pricevault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query partitioned OHLCV parquet data in an object store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a range query
    Get {
        /// Query as symbol,timeframe,range (e.g. CIPLA,15m,7d)
        params: String,
        /// Exchange code (default: from config)
        #[arg(short, long)]
        exchange: Option<String>,
        /// Maximum number of files to read (default: from config)
        #[arg(short, long)]
        max_files: Option<usize>,
        /// Access key id, paired with --secret-key
        #[arg(long, requires = "secret_key")]
        access_key: Option<String>,
        /// Secret access key, paired with --access-key
        #[arg(long, requires = "access_key")]
        secret_key: Option<String>,
    },

    /// Fetch one object by its full key
    Key {
        /// Object key inside the bucket
        key: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {}", path.display()))?;
                eprintln!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.logging.init_tracing();

    let provider = ConfiguredStoreProvider::new(config.store.clone());

    let table = match cli.command {
        Commands::Get {
            params,
            exchange,
            max_files,
            access_key,
            secret_key,
        } => {
            let defaults = &config.retrieval;
            let query = PriceQuery::parse(
                &params,
                exchange.as_deref().unwrap_or(&defaults.default_exchange),
                max_files.unwrap_or(defaults.default_max_files),
            )?;
            let credentials = access_key
                .zip(secret_key)
                .map(|(key, secret)| Credentials::new(key, secret));
            let store = provider.store_for(credentials.as_ref())?;

            let result = RetrievalOrchestrator::new(store)
                .prefix_root(defaults.prefix_root.as_str())
                .run(&query, Utc::now())
                .await?;
            eprintln!(
                "{}: {} rows from {} files ({} skipped)",
                query.symbol_partition(),
                result.rows_returned(),
                result.files_read,
                result.files_skipped
            );
            result.table
        }
        Commands::Key { key } => {
            let store = provider.store_for(None)?;
            let mut table = ObjectFetcher::new(store).fetch_key(&key).await?;
            normalize_naive(&mut table);
            eprintln!("{}: {} rows", key, table.len());
            table
        }
        Commands::Config { .. } => return Ok(()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &table.rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&table, &mut out)?,
    }

    Ok(())
}

/// Write rows as CSV with the table's column order as header
fn write_csv(table: &Table, out: impl Write) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| match row.get(column) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
