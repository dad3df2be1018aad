//! LitLite main entry point
//!
//! This is the command-line interface for the LitLite archive scraper and
//! summary site generator.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use litlite::config::{load_config_with_hash, validate, Config};
use litlite::output::{generate_site, load_statistics, print_statistics};
use litlite::scrape::scrape;
use litlite::storage::{load_sample_data, migrate_legacy, open_storage, SqliteStorage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// LitLite: an excerpt library for a public literary archive
///
/// LitLite scrapes author and work rosters, stores a short excerpt of each
/// work in a SQLite store, and renders the store as a static website.
#[derive(Parser, Debug)]
#[command(name = "litlite")]
#[command(version)]
#[command(about = "Archive scraper and static summary site generator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the summary store
    Init {
        /// Load the bundled sample works
        #[arg(long)]
        sample: bool,

        /// Delete an existing store first
        #[arg(long)]
        force: bool,
    },

    /// Scrape the archive into the store
    Scrape {
        /// Validate config and show what would be scraped without scraping
        #[arg(long)]
        dry_run: bool,
    },

    /// Render the static site from the store
    Generate,

    /// Copy rows from a legacy store into a new store
    Migrate {
        /// Legacy store to read
        #[arg(long, value_name = "OLD")]
        from: PathBuf,

        /// Store to create (defaults to the database path with a `_new` suffix)
        #[arg(long, value_name = "NEW")]
        to: Option<PathBuf>,
    },

    /// Show statistics from the store and exit
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Init { sample, force } => handle_init(&config, sample, force),
        Command::Scrape { dry_run: true } => {
            handle_dry_run(&config);
            Ok(())
        }
        Command::Scrape { dry_run: false } => handle_scrape(config).await,
        Command::Generate => handle_generate(&config),
        Command::Migrate { from, to } => handle_migrate(&config, &from, to),
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("litlite=info,warn"),
            1 => EnvFilter::new("litlite=debug,info"),
            2 => EnvFilter::new("litlite=trace,debug"),
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

/// Loads and validates the configuration file, or the defaults
fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using built-in defaults");
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Handles `init`: creates the store, optionally with sample data
fn handle_init(config: &Config, sample: bool, force: bool) -> Result<()> {
    let path = Path::new(&config.output.database_path);

    if path.exists() {
        if force {
            tracing::info!("Removing existing store {}", path.display());
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        } else {
            tracing::info!("Store {} already exists; keeping it", path.display());
        }
    }

    let mut storage = SqliteStorage::create(path)?;
    println!("✓ Store ready: {}", path.display());

    if sample {
        let ids = load_sample_data(&mut storage)?;
        println!("✓ Added {} sample works", ids.len());
    }

    Ok(())
}

/// Handles `scrape --dry-run`: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let scraper = &config.scraper;

    println!("=== LitLite Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", scraper.base_url);
    println!("  Author index: {}", scraper.author_index_path);
    match &scraper.author_link_pattern {
        Some(pattern) => println!("  Author links: matching /{}/", pattern),
        None => println!("  Author links: containing '{}'", scraper.author_link),
    }
    match &scraper.work_link_pattern {
        Some(pattern) => println!("  Work links: matching /{}/", pattern),
        None => println!("  Work links: containing '{}'", scraper.work_link),
    }
    println!("  Text link markers: {}", scraper.text_link_markers.join(", "));
    println!("  Content selector: {}", scraper.content_selector);
    println!("  Request timeout: {}s", scraper.request_timeout_secs);
    println!("  Request delay: {}ms", scraper.request_delay_ms);
    println!("  Max authors: {}", scraper.max_authors);
    println!("  Works per author: {}", scraper.works_per_author);
    let windows: Vec<String> = scraper
        .probe_windows
        .iter()
        .map(|[start, end]| format!("[{}, {})", start, end))
        .collect();
    println!("  Probe windows: {}", windows.join(" "));
    println!("  Minimum text length: {}", scraper.min_text_length);
    println!("  Fallback encoding: {}", scraper.fallback_encoding);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSummary:");
    println!("  Excerpt length: {} chars", config.summary.max_chars);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Site: {}", config.output.site_dir);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would scrape up to {} works from up to {} authors",
        scraper.max_authors * scraper.works_per_author,
        scraper.max_authors
    );
}

/// Handles `scrape`: runs the pipeline
async fn handle_scrape(config: Config) -> Result<()> {
    match scrape(config).await {
        Ok(report) => {
            tracing::info!("Scrape completed successfully");
            println!(
                "✓ Stored {} works ({} skipped) from {} of {} authors",
                report.works_stored,
                report.works_skipped,
                report.authors_selected,
                report.authors_in_roster
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `generate`: renders the site from the store
fn handle_generate(config: &Config) -> Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let report = generate_site(&storage, config)?;

    println!(
        "✓ Wrote {} work pages and {} listing pages to {}",
        report.detail_pages,
        report.listing_pages,
        report.output_dir.display()
    );
    if report.failed_pages > 0 {
        println!("⚠ {} work pages could not be written", report.failed_pages);
    }
    println!("  Open {}", report.output_dir.join("index.html").display());

    Ok(())
}

/// Handles `migrate`: copies legacy rows into a new store
fn handle_migrate(config: &Config, from: &Path, to: Option<PathBuf>) -> Result<()> {
    let to = to.unwrap_or_else(|| default_migration_target(Path::new(&config.output.database_path)));
    let copied = migrate_legacy(from, &to)
        .with_context(|| format!("failed to migrate {}", from.display()))?;

    println!("✓ Migrated {} works into {}", copied, to.display());
    println!("  Back up {} and rename the new store to use it", from.display());

    Ok(())
}

/// `summaries.db` becomes `summaries_new.db`
fn default_migration_target(database: &Path) -> PathBuf {
    let stem = database
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "summaries".to_string());
    let name = match database.extension() {
        Some(ext) => format!("{}_new.{}", stem, ext.to_string_lossy()),
        None => format!("{}_new", stem),
    };
    database.with_file_name(name)
}

/// Handles `stats`: shows statistics from the store
fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}
