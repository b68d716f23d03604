//! GastroMiner main entry point
//!
//! This is the command-line interface for the GastroMiner nutritional-data
//! extractor.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use gastrominer::config::{load_config_with_hash, Config};
use gastrominer::miner::{
    probe_names, run_extraction, DEFAULT_PROBE_LIMIT, DEFAULT_PROBE_START,
};
use gastrominer::output::{format_elapsed, print_dry_run, print_probe_report, print_summary};
use gastrominer::GastroError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// GastroMiner: a polite nutritional-data extractor
///
/// GastroMiner downloads every public food record from an XML query service
/// (BEDCA by default) and writes one CSV row per food. It honors robots.txt,
/// throttles every request, and keeps going when a single record fails.
#[derive(Parser, Debug)]
#[command(name = "gastrominer")]
#[command(version)]
#[command(about = "A polite nutritional-data extractor", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (built-in BEDCA defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and print it without any network access
    #[arg(long, conflicts_with = "probe_names")]
    dry_run: bool,

    /// Probe candidate name tags on a slice of the catalog and exit
    #[arg(long)]
    probe_names: bool,

    /// Catalog index the probe starts at
    #[arg(long, default_value_t = DEFAULT_PROBE_START, requires = "probe_names")]
    probe_start: usize,

    /// Number of identifiers to probe
    #[arg(long, default_value_t = DEFAULT_PROBE_LIMIT, requires = "probe_names")]
    probe_limit: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Fatal error in config phase: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.dry_run {
        print_dry_run(&config);
        return ExitCode::SUCCESS;
    }

    let result = if cli.probe_names {
        handle_probe(&config, cli.probe_start, cli.probe_limit).await
    } else {
        handle_extraction(config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal error in {} phase: {}", e.phase(), e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gastrominer=info,warn"),
            1 => EnvFilter::new("gastrominer=debug,info"),
            2 => EnvFilter::new("gastrominer=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("could not load {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --probe-names mode
async fn handle_probe(config: &Config, start: usize, limit: usize) -> Result<(), GastroError> {
    let report = probe_names(config, start, limit).await?;
    print_probe_report(&report);
    Ok(())
}

/// Handles the main extraction run
async fn handle_extraction(config: Config) -> Result<(), GastroError> {
    println!("==============================================");
    println!(" GastroMiner v{}", env!("CARGO_PKG_VERSION"));
    println!(" Target: {}", config.endpoint.url);
    println!(" Output: {}", config.output.csv_path);
    println!("==============================================");
    println!("Start: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let started = Instant::now();
    let result = run_extraction(config).await;
    let elapsed = started.elapsed();

    println!("\n=== Execution Report ===");
    println!("End: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Elapsed: {}", format_elapsed(elapsed));

    match result {
        Ok(summary) => {
            let status = if summary.interrupted {
                "interrupted by user"
            } else {
                "completed"
            };
            println!("Status: {}\n", status);
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            println!("Status: failed");
            Err(e)
        }
    }
}
