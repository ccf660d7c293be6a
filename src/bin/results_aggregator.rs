//! Averages the `results.csv` files of an experiment tree into `results.log`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, Result};

use repsim::analysis::aggregate::{aggregate_results, write_results_log};

#[derive(Parser, Debug)]
#[command(name = "repsim-aggregate")]
#[command(about = "Aggregate per-peer Sybil robustness results")]
#[command(version)]
struct Cli {
    /// Directory searched recursively for results.csv files
    data_dir: PathBuf,

    /// Sybil region size the results were produced with
    #[arg(long, env = "SYBIL_REGION_SIZE", default_value = "50")]
    region_size: usize,

    /// Aggregated output file
    #[arg(short, long, default_value = "results.log")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    if !cli.data_dir.is_dir() {
        bail!("{} is not a directory", cli.data_dir.display());
    }

    let averages = aggregate_results(&cli.data_dir)?;
    if averages.is_empty() {
        log::warn!("No result rows found under {}", cli.data_dir.display());
    }

    for avg in &averages {
        log::info!(
            "{}: rank ratio {:.6}, value ratio {:.6} over {} rows",
            avg.algorithm,
            avg.avg_rank_ratio,
            avg.avg_value_ratio,
            avg.samples
        );
    }

    write_results_log(cli.region_size, &averages, &cli.output)
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
    fn test_defaults() {
        let cli = Cli::try_parse_from(["repsim-aggregate", "out", "--region-size", "10"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("out"));
        assert_eq!(cli.region_size, 10);
        assert_eq!(cli.output, PathBuf::from("results.log"));
    }
}
