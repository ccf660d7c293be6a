//! Sybil robustness experiments over a transaction log.
//!
//! `repsim run` evaluates sampled seed identities under all three reputation
//! algorithms and writes `results.csv`. `repsim rank` prints a single ranking.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Context, Result};
use env_logger::Env;
use log::{info, LevelFilter};

use repsim::analysis::{self, report, RunMetadata, RunSummary};
use repsim::config::Config;
use repsim::config_loader::{self, CliOverrides};
use repsim::ledger::{self, identities, Transaction};
use repsim::orchestrator;
use repsim::rank::{compute_reputation, Algorithm};

#[derive(Parser, Debug)]
#[command(name = "repsim")]
#[command(about = "Sybil robustness experiments for PageRank-family reputation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error); defaults to the config's general.log_level
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run Sybil trials for sampled seed identities
    Run {
        /// Transaction log (from_id,to_id,value,sequence)
        #[arg(short, long)]
        transactions: PathBuf,

        /// Experiment configuration YAML
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Result rows output
        #[arg(short, long, default_value = "results.csv")]
        output: PathBuf,

        /// Optional JSON summary output
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Fake identities attached to each compromised identity
        #[arg(long, env = "SYBIL_REGION_SIZE")]
        region_size: Option<usize>,

        /// Identities compromised per trial
        #[arg(long)]
        num_compromised: Option<usize>,

        /// Seed of the run's random generator
        #[arg(long)]
        rng_seed: Option<u64>,

        /// Number of seed identities to evaluate
        #[arg(long)]
        seeds: Option<usize>,

        /// Number of parallel workers (0 = auto-detect)
        #[arg(short = 'j', long, default_value = "0")]
        threads: usize,
    },

    /// Print the top of one ranking
    Rank {
        /// Transaction log (from_id,to_id,value,sequence)
        #[arg(short, long)]
        transactions: PathBuf,

        /// pagerank, personalised or temporal
        #[arg(short, long, default_value = "pagerank")]
        algorithm: Algorithm,

        /// Seed identity for the personalised and temporal variants
        #[arg(short, long)]
        seed: Option<String>,

        /// Number of entries to print
        #[arg(long, default_value = "10")]
        top: usize,

        /// Experiment configuration YAML (solver and reciprocal flow settings)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Initialize logging before the config is read so loading is reported
    let level_from_config = init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Run {
            transactions,
            config,
            output,
            summary,
            region_size,
            num_compromised,
            rng_seed,
            seeds,
            threads,
        } => {
            let mut config = read_config(config.as_deref())?;
            if level_from_config {
                apply_config_log_level(&config);
            }

            let overrides = CliOverrides {
                region_size,
                num_compromised,
                rng_seed,
                seed_identity_sample_size: seeds,
            };
            config_loader::apply_overrides(&mut config, &overrides)?;

            if threads > 0 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("Failed to configure thread pool")?;
            }

            run(&transactions, &config, &output, summary.as_deref())
        }
        Commands::Rank {
            transactions,
            algorithm,
            seed,
            top,
            config,
        } => {
            let config = read_config(config.as_deref())?;
            if level_from_config {
                apply_config_log_level(&config);
            }
            rank(&transactions, &config, algorithm, seed.as_deref(), top)
        }
    }
}

fn read_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config_loader::load_config(path),
        None => Ok(Config::default()),
    }
}

/// Start env_logger. Returns true when neither `--log-level` nor `RUST_LOG`
/// was given, in which case the config's `general.log_level` decides the
/// level once the config is loaded.
fn init_logging(cli_level: Option<&str>) -> bool {
    let level_from_config = cli_level.is_none() && std::env::var_os("RUST_LOG").is_none();

    if level_from_config {
        // Let the logger pass everything and gate on the global max level instead
        env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
        log::set_max_level(LevelFilter::Info);
    } else {
        env_logger::Builder::from_env(Env::default().default_filter_or(cli_level.unwrap_or("info")))
            .init();
    }
    level_from_config
}

fn config_log_level(config: &Config) -> LevelFilter {
    config
        .general
        .log_level
        .as_deref()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn apply_config_log_level(config: &Config) {
    log::set_max_level(config_log_level(config));
}

fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let transactions = ledger::load(path)
        .with_context(|| format!("Failed to load transactions from {}", path.display()))?;
    if transactions.is_empty() {
        bail!("{} contains no transactions", path.display());
    }
    info!("{} identities in the log", identities(&transactions).len());
    Ok(transactions)
}

fn run(transactions_path: &Path, config: &Config, output: &Path, summary_path: Option<&Path>) -> Result<()> {
    let transactions = load_transactions(transactions_path)?;
    let outcome = orchestrator::run_experiment(&transactions, config)?;

    analysis::write_results_csv(&outcome.records, output)?;

    let summary = RunSummary {
        metadata: create_metadata(transactions_path, &transactions, config),
        averages: analysis::average_by_algorithm(&outcome.records),
        trials_completed: outcome.trials_completed,
        failures: outcome.failures,
    };

    if let Some(path) = summary_path {
        analysis::write_json_summary(&summary, path)?;
    }

    report::print_summary(&summary);
    Ok(())
}

fn create_metadata(path: &Path, transactions: &[Transaction], config: &Config) -> RunMetadata {
    RunMetadata {
        analysis_timestamp: chrono::Utc::now().to_rfc3339(),
        transaction_log: path.display().to_string(),
        total_transactions: transactions.len(),
        total_identities: identities(transactions).len(),
        region_size: config.attack.region_size,
        num_compromised: config.attack.num_compromised,
        rng_seed: config.experiment.rng_seed,
    }
}

fn rank(
    transactions_path: &Path,
    config: &Config,
    algorithm: Algorithm,
    seed: Option<&str>,
    top: usize,
) -> Result<()> {
    let seed = match (algorithm, seed) {
        (_, Some(seed)) => seed,
        (Algorithm::PageRank, None) => "",
        (_, None) => bail!("{} needs a --seed identity", algorithm),
    };

    let transactions = load_transactions(transactions_path)?;
    let params = config.evaluation_params().ranking();
    let ranking = compute_reputation(algorithm, seed, &transactions, &params)?;

    println!("{} ({} identities)", algorithm, ranking.len());
    for (position, (identity, score)) in ranking.top(top).into_iter().enumerate() {
        println!("{:>6}  {:<24} {:.8}", position + 1, identity, score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_log_level() {
        let mut config = Config::default();
        assert_eq!(config_log_level(&config), LevelFilter::Info);

        config.general.log_level = Some("debug".to_string());
        assert_eq!(config_log_level(&config), LevelFilter::Debug);

        config.general.log_level = None;
        assert_eq!(config_log_level(&config), LevelFilter::Info);
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "repsim",
            "run",
            "--transactions",
            "txs.csv",
            "--region-size",
            "25",
            "--seeds",
            "10",
            "-j",
            "4",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                transactions,
                output,
                region_size,
                seeds,
                threads,
                num_compromised,
                ..
            } => {
                assert_eq!(transactions, PathBuf::from("txs.csv"));
                assert_eq!(output, PathBuf::from("results.csv"));
                assert_eq!(region_size, Some(25));
                assert_eq!(seeds, Some(10));
                assert_eq!(threads, 4);
                assert_eq!(num_compromised, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rank_arguments() {
        let cli = Cli::try_parse_from([
            "repsim",
            "rank",
            "-t",
            "txs.csv",
            "--algorithm",
            "temporal",
            "--seed",
            "alice",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Rank { algorithm, seed, top, .. } => {
                assert_eq!(algorithm, Algorithm::TemporalPageRank);
                assert_eq!(seed.as_deref(), Some("alice"));
                assert_eq!(top, 10);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let result = Cli::try_parse_from([
            "repsim", "rank", "-t", "txs.csv", "--algorithm", "eigentrust",
        ]);
        assert!(result.is_err());
    }
}
