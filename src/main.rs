//! etcsl-harvest main entry point
//!
//! Command-line interface for the corpus ingestion pipeline.

use anyhow::Context;
use clap::Parser;
use etcsl_harvest::config::{load_config_with_hash, validate, Config};
use etcsl_harvest::Harvester;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// etcsl-harvest: corpus ingestion for linked HTML reference works
///
/// Discovers entry pages from catalog and section seeds, extracts a
/// normalized record from each page, and writes the records as a
/// line-delimited JSON corpus for downstream training tooling.
#[derive(Parser, Debug)]
#[command(name = "etcsl-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Harvest a linked HTML reference work into a JSONL corpus", long_about = None)]
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

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    /// Override the corpus output path from the config
    #[arg(long, value_name = "PATH")]
    output: Option<String>,

    /// Override the direct entry seeds from the config (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Override the entry link markers from the config (repeatable)
    #[arg(long = "entry-marker", value_name = "SUBSTRING")]
    entry_markers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Apply CLI overrides, then re-validate the merged configuration
    if let Some(output) = cli.output {
        config.output.corpus_path = output;
    }
    if !cli.seeds.is_empty() {
        config.discovery.entry_seeds = cli.seeds;
        config.discovery.section_seeds.clear();
    }
    if !cli.entry_markers.is_empty() {
        config.discovery.entry_markers = cli.entry_markers;
    }
    validate(&config).context("invalid configuration after CLI overrides")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("etcsl_harvest=info,warn"),
            1 => EnvFilter::new("etcsl_harvest=debug,info"),
            2 => EnvFilter::new("etcsl_harvest=trace,debug"),
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
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    // Builds the vocabulary and client exactly as a real run would, so a
    // dry run catches unknown tags and unusable vocabulary files too.
    let harvester = Harvester::new(config.clone())?;

    println!("=== etcsl-harvest Dry Run ===\n");

    println!("Fetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Concurrent fetches: {}", config.fetch.concurrent_fetches);
    println!("  Progress cadence: every {} entries", config.fetch.report_every);

    println!("\nDiscovery:");
    println!("  Entry seeds ({}):", config.discovery.entry_seeds.len());
    for seed in &config.discovery.entry_seeds {
        println!("    - {}", seed);
    }
    println!("  Section seeds ({}):", config.discovery.section_seeds.len());
    for seed in &config.discovery.section_seeds {
        println!("    - {}", seed);
    }
    println!("  Entry markers: {:?}", config.discovery.entry_markers);
    if !config.discovery.section_markers.is_empty() {
        println!("  Section markers: {:?}", config.discovery.section_markers);
    }

    println!("\nOutput:");
    println!("  Corpus: {}", config.output.corpus_path);

    println!("\nTagging:");
    println!("  Category: {}", config.tagging.category);
    println!("  Tags: {:?}", config.tagging.tags);
    println!(
        "  Vocabulary: {} label(s){}",
        harvester.vocabulary().len(),
        match &config.tagging.vocabulary_path {
            Some(path) => format!(" from {}", path),
            None => " (built-in)".to_string(),
        }
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would harvest from {} seed page(s)",
        config.discovery.seed_count()
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    let corpus_path = config.output.corpus_path.clone();
    let mut harvester = Harvester::new(config)?;

    // Ctrl-C aborts cooperatively between entries; in-flight fetches finish
    // or time out on their own.
    let cancel = harvester.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight entries");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    match harvester.run().await {
        Ok(report) => {
            tracing::info!(
                "Corpus written to {}: {} records, {} skipped",
                corpus_path,
                report.written,
                report.skipped_fetch + report.skipped_parse
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
