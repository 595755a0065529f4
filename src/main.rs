//! PTT camera crawler entry point
//!
//! Command-line interface for crawling a board's sale posts into CSV files.

use clap::Parser;
use ptt_camera_crawler::config::{load_config_with_hash, Config};
use ptt_camera_crawler::crawler::Coordinator;
use ptt_camera_crawler::storage::{CheckpointStore, FileCheckpoint};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Crawls used-camera sale posts from a PTT board
///
/// Each listing page's valid offers are written to `<records-dir>/<page>.csv`.
/// Progress is checkpointed after every page, so an interrupted crawl picks
/// up where it stopped.
#[derive(Parser, Debug)]
#[command(name = "ptt-camera-crawler")]
#[command(version)]
#[command(about = "Crawls used-camera sale posts from a PTT board", long_about = None)]
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

    /// Start from the configured start page, ignoring the checkpoint
    #[arg(long)]
    fresh: bool,

    /// Override the number of listing pages to visit
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Show the configuration and resume point without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(pages) = cli.pages {
        config.crawler.pages = pages;
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.fresh)?;
    } else {
        handle_crawl(&config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ptt_camera_crawler=info,warn"),
            1 => EnvFilter::new("ptt_camera_crawler=debug,info"),
            2 => EnvFilter::new("ptt_camera_crawler=trace,debug"),
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

/// Handles the --dry-run mode
fn handle_dry_run(config: &Config, fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PTT Camera Crawler Dry Run ===\n");

    println!("Board:");
    println!("  Host: {}", config.board.host);
    println!("  Name: {}", config.board.name);
    println!("  Root listing: {}", config.root_listing_url());
    println!("  Source tag: {}", config.board.source);
    println!("  Sale marker: {}", config.board.sale_marker);
    println!("  Reply marker: {}", config.board.reply_marker);

    println!("\nCrawler:");
    println!("  Pages per run: {}", config.crawler.pages);
    println!(
        "  Concurrent posts: {}",
        config.crawler.max_concurrent_posts
    );

    println!("\nOutput:");
    println!("  Records directory: {}", config.output.records_dir);
    println!("  Checkpoint: {}", config.output.checkpoint_path);

    let checkpoint = FileCheckpoint::new(&config.output.checkpoint_path);
    let start = match checkpoint.read()? {
        Some(url) if !fresh => url,
        _ => config.root_listing_url(),
    };

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", start);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume from checkpoint if present)");
    }

    let mut coordinator = Coordinator::new(config, fresh)?;

    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.store(true, Ordering::SeqCst);
        }
    });

    match coordinator.run().await {
        Ok(stats) => {
            stats.log_summary();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
