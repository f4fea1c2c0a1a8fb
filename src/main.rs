//! aewiki recap - a terminal viewer for daily contributor recaps.
//!
//! Fetches the dated contributor snapshots published by the wiki's data
//! repository, caches them locally for offline viewing, and prints the
//! ranked leaderboard for the requested (or most recent) day.

mod api;
mod cache;
mod config;
mod models;
mod recap;
mod ui;
mod utils;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::{RecapClient, RecapError};
use cache::{AvailabilityIndex, SnapshotStore};
use config::Config;
use recap::RecapService;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Parse `--date YYYY-MM-DD` (or `--date=YYYY-MM-DD`) from the CLI args.
fn date_arg(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--date" {
            return iter.next().cloned();
        }
        if let Some(value) = arg.strip_prefix("--date=") {
            return Some(value.to_string());
        }
    }
    None
}

fn print_usage() {
    println!("Usage: recap [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --date YYYY-MM-DD   Show the recap for a specific day");
    println!("  --refresh-index     Discard the saved file listing and fetch a fresh one");
    println!("  -h, --help          Print this help");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("aewiki recap starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let date_override = date_arg(&args);

    let config = Config::load()?;
    let cache_dir = config.cache_dir()?;

    if args.iter().any(|a| a == "--refresh-index") {
        let index_path = cache_dir.join(cache::availability::INDEX_FILE_NAME);
        if index_path.exists() {
            std::fs::remove_file(&index_path)?;
            info!("Removed persisted availability index, forcing a fresh listing");
        }
    }

    let client = RecapClient::new(config.listing_url(), config.snapshot_base_url())?;
    let store = SnapshotStore::new(cache_dir.clone())?;
    let index = AvailabilityIndex::new(&cache_dir);
    let mut service = RecapService::new(client, store, index);

    let date = service.resolve_initial_date(date_override.as_deref()).await;

    match service.fetch(&date).await {
        Ok(snapshot) => {
            ui::render::print_recap(&date, &snapshot);
            println!();
            // Neighbor days, mirroring the page's prev/next links
            if let (Ok(prev), Ok(next)) = (date.subtract_days(1), date.add_days(1)) {
                println!("Previous: recap --date {}   Next: recap --date {}", prev, next);
            }
            println!("Share: {}", recap::permalink(&config.recap_page_url(), &date));
        }
        Err(RecapError::NotAvailable(date)) => {
            println!("No recap data available for {}.", date);
        }
        Err(e) => {
            eprintln!("Failed to load recap: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
