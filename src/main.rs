//! Stable Match - Binary Entry Point
//!
//! Generates random preferences for two groups, runs deferred acceptance
//! and reports the pairing.
//!
//! ```bash
//! stable-match -n 1000 --seed 42
//! stable-match -n 4 -v
//! stable-match -n 4 --json > run.json
//! ```

use clap::Parser;
use serde::Serialize;
use tracing::info;

use stable_match::config::{RunConfig, DEFAULT_GROUP_SIZE};
use stable_match::generation::{LogProgress, PreferenceGenerator};
use stable_match::logging::{init_logging, LogFormat};
use stable_match::{MatchingEngine, Pairing, PreferenceSnapshot, TransitionLog};

#[derive(Parser, Debug)]
#[command(name = "stable-match")]
#[command(about = "Stable matching between two random groups via deferred acceptance")]
#[command(version)]
struct Cli {
    /// The group size for each side
    #[arg(short = 'n', long, default_value_t = DEFAULT_GROUP_SIZE, env = "STABLE_MATCH_GROUP_SIZE")]
    group_size: usize,

    /// Print the generated groups and the final matches
    #[arg(short, long)]
    verbose: bool,

    /// Seed for reproducible preferences
    #[arg(long, env = "STABLE_MATCH_SEED")]
    seed: Option<u64>,

    /// Generation worker threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Log output format: pretty, json or compact
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Write preferences, pairing and transition log to stdout as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    seed: u64,
    preferences: &'a PreferenceSnapshot,
    pairing: &'a Pairing,
    transitions: &'a TransitionLog,
    fingerprint: &'a str,
    proposals: usize,
    elapsed_micros: u128,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let config = RunConfig {
        group_size: cli.group_size,
        verbose: cli.verbose,
        seed: cli.seed,
        workers: cli.workers,
    };

    let generator = PreferenceGenerator::from_config(&config)?;
    let progress = LogProgress::new(config.group_size);
    let groups = generator.generate_with_progress(&progress)?;
    let seed = groups.seed;
    let snapshot = groups.snapshot();

    info!("Starting matching process...");
    let outcome = MatchingEngine::from_groups(groups)?.run()?;
    let fingerprint = outcome.log.fingerprint_hex()?;

    info!(
        seed,
        fingerprint = %fingerprint,
        elapsed = ?outcome.elapsed,
        "stable matching took {:?}",
        outcome.elapsed
    );

    if cli.json {
        let report = Report {
            seed,
            preferences: &snapshot,
            pairing: &outcome.pairing,
            transitions: &outcome.log,
            fingerprint: &fingerprint,
            proposals: outcome.proposals,
            elapsed_micros: outcome.elapsed.as_micros(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if cli.verbose {
        println!("Matches:");
        println!("R <-> P");
        println!("=======");
        for pair in &outcome.pairing {
            println!("{} <-> {}", pair.receiver_id, pair.proposer_id);
        }
    }

    Ok(())
}
