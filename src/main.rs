//! Cuvée main entry point
//!
//! This is the command-line interface for the Cuvée catalog harvester.

use clap::Parser;
use cuvee::config::load_config;
use cuvee::harvest::harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cuvée: an incremental wine-catalog harvester
///
/// Cuvée walks a paginated catalog, extracts structured attributes for every
/// item it has not seen before, caches one image per item, and merges the
/// results into a CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "cuvee")]
#[command(version = "1.0.0")]
#[command(about = "An incremental wine-catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore the prior dataset for discovery and re-walk every item
    #[arg(long)]
    full: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.full).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cuvee=info,warn"),
            1 => EnvFilter::new("cuvee=debug,info"),
            2 => EnvFilter::new("cuvee=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the harvest plan
fn handle_dry_run(config: &cuvee::Config) {
    println!("=== Cuvée Dry Run ===\n");

    println!("Catalog:");
    println!("  Hostname: {}", config.catalog.hostname);
    println!(
        "  Page tokens: {:?}",
        config.catalog.page_sequence()
    );
    println!(
        "  Item request delay: {}ms",
        config.catalog.request_delay_ms
    );
    println!("  Retry delay: {}ms", config.catalog.retry_delay_ms);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.save_path);
    println!("  Image cache: {}", config.output.img_dir);

    let prior_exists = std::path::Path::new(&config.output.save_path).exists();
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would run in {} mode",
        if prior_exists { "incremental" } else { "full" }
    );
}

/// Handles the main harvest operation
async fn handle_harvest(config: cuvee::Config, full: bool) -> anyhow::Result<()> {
    if full {
        tracing::info!("Running full harvest (prior titles ignored for discovery)");
    }

    let report = harvest(config, full).await?;

    if report.updated {
        println!("Harvested {} new record(s)", report.new_records);
    } else {
        println!("No new records, dataset untouched");
    }

    if !report.failures.is_empty() {
        println!("{} item(s) failed:", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.url, failure.reason);
        }
    }

    Ok(())
}
