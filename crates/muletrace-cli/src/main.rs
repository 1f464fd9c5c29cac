//! Muletrace CLI.
//!
//! Batch commands around the forensics engine: analyze a CSV transaction
//! batch into the JSON report, or generate a synthetic batch with planted
//! muling patterns.

use clap::{Parser, Subcommand};
use muletrace_core::config::AnalysisConfig;
use muletrace_detect::ForensicsEngine;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ingest;
mod synth;

#[derive(Parser)]
#[command(name = "muletrace")]
#[command(version, about = "Money-muling forensics over transaction batches", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV batch and emit the JSON report
    Analyze {
        /// Input CSV (columns: transaction_id, sender_id, receiver_id,
        /// amount, timestamp)
        input: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Override the fan-in/fan-out hub threshold
        #[arg(long)]
        fan_threshold: Option<usize>,

        /// Override the suspicion reporting threshold
        #[arg(long)]
        score_threshold: Option<f64>,
    },

    /// Generate a synthetic batch with planted muling patterns
    Generate {
        /// Output CSV path
        output: PathBuf,

        /// RNG seed, for reproducible batches
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of legitimate background transactions
        #[arg(long, default_value_t = 30)]
        background: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout stays reserved for report JSON.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            pretty,
            fan_threshold,
            score_threshold,
        } => {
            let mut config = AnalysisConfig::default();
            if let Some(threshold) = fan_threshold {
                config.fan_threshold = threshold;
            }
            if let Some(threshold) = score_threshold {
                config.suspicious_score_threshold = threshold;
            }
            let engine = ForensicsEngine::with_config(config)?;

            let transactions = ingest::read_csv(&input)?;
            tracing::info!(
                transactions = transactions.len(),
                input = %input.display(),
                "batch loaded"
            );

            let report = engine.analyze(&transactions);
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => println!("{json}"),
            }
        }

        Commands::Generate {
            output,
            seed,
            background,
        } => {
            let count = synth::write_batch(&output, seed, background)?;
            tracing::info!(
                transactions = count,
                path = %output.display(),
                "synthetic batch written"
            );
        }
    }

    Ok(())
}
