use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use casewatch::config::WatchConfig;
use casewatch::fetch::StatusFetcher;
use casewatch::store::StatusStore;

#[derive(Parser)]
#[command(
    name = "casewatch",
    about = "USCIS case status watcher with SMS change notifications",
    version,
    long_about = None
)]
struct Cli {
    /// Config file path (falls back to CASEWATCH_CONFIG, then casewatch.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the case status once and notify on change
    Watch,

    /// Fetch and print the current status without touching the store
    Check,

    /// Write the initial last-known-status record for the watched case
    Seed {
        /// Status to store, e.g. "Case Was Received"
        #[arg(long)]
        status: String,
    },

    /// Print the stored last known status
    Status,
}

fn load_config(flag: Option<&str>) -> Result<WatchConfig> {
    let path = WatchConfig::resolve_path(flag);
    WatchConfig::load(Path::new(&path))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch => {
            tracing::info!(receipt_number = %config.receipt_number, "Running status watch");
            let outcome = casewatch::run_watch(&config).await?;
            println!("{}", outcome);
        }
        Commands::Check => {
            config.validate()?;
            tracing::info!(receipt_number = %config.receipt_number, "Checking current status");
            let fetcher = StatusFetcher::new(&config.status_page_url);
            let status = fetcher.fetch_current_status(&config.receipt_number).await?;
            println!("{}", status);
        }
        Commands::Seed { status } => {
            config.validate()?;
            let store = StatusStore::open(&config.db_path)?;
            store.set_last_known_status(&config.receipt_number, &status)?;
            println!(
                "Seeded '{}' with last known status \"{}\".",
                config.receipt_number, status
            );
        }
        Commands::Status => {
            config.validate()?;
            let store = StatusStore::open(&config.db_path)?;
            let (status, updated_at) = store.record(&config.receipt_number)?;
            println!("{:<20} | {}", "Receipt number", config.receipt_number);
            println!("{:<20} | {}", "Last known status", status);
            println!("{:<20} | {}", "Updated at", updated_at);
        }
    }

    Ok(())
}
