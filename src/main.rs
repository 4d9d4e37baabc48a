//! Dayveil - Privacy-Tiered Activity Digests
//!
//! Command line entry point: runs the digest pipeline over a day of
//! activity records, scrubs arbitrary text, and prints configuration.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dayveil::activity::ActivityRecord;
use dayveil::config::DayveilConfig;
use dayveil::pipeline::DigestPipeline;
use dayveil::scrub::Scrubber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dayveil")]
#[command(version)]
#[command(about = "Privacy-tiered daily activity digests")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DAYVEIL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the digest pipeline over a day of activity records
    Digest {
        /// Activity records file, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Digest date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print the full outcome as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Scrub secrets and PII from text
    Scrub {
        /// File to scrub; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dayveil={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        toml::from_str(&content)?
    } else {
        DayveilConfig::default()
    };

    match cli.command {
        Commands::Digest { input, date, json } => {
            run_digest(config, &input, date, json).await?;
        }
        Commands::Scrub { input } => {
            run_scrub(input.as_deref())?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_digest(
    config: DayveilConfig,
    input: &Path,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let records = read_records(input)?;
    let day = date.unwrap_or_else(|| Utc::now().date_naive());

    let pipeline = DigestPipeline::from_config(config);
    let outcome = pipeline.run(records, day).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", outcome.prompt.prompt);
    println!("--- telemetry ---");
    println!("tier: {}", outcome.prompt.tier);
    println!(
        "records: {} in, {} kept",
        outcome.records_in, outcome.records_kept
    );
    println!("events classified: {}", outcome.events_classified);
    println!("estimated tokens: {}", outcome.prompt.token_estimate);
    if outcome.filtered.total > 0 {
        println!(
            "sensitive records filtered: {} ({} visits, {} queries)",
            outcome.filtered.total, outcome.filtered.visits, outcome.filtered.queries
        );
        for (category, count) in &outcome.filtered.by_category {
            println!("  {}: {}", category, count);
        }
    }

    Ok(())
}

/// Read activity records from a JSONL file, skipping malformed lines.
fn read_records(path: &Path) -> Result<Vec<ActivityRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ActivityRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("skipping malformed record on line {}: {}", number + 1, e),
        }
    }
    Ok(records)
}

fn run_scrub(input: Option<&Path>) -> Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let scrubber = Scrubber::new();
    print!("{}", scrubber.scrub(&text));
    Ok(())
}

fn show_config(config: Option<&DayveilConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
