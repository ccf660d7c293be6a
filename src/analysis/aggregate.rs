//! Aggregation of per-peer result files.
//!
//! Experiments leave one `results.csv` per peer somewhere below an output
//! directory. These are averaged per algorithm into a `results.log` with one
//! `region_size,avg_rank_ratio,avg_value_ratio,algorithm` line per algorithm.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

use super::report::{average_by_algorithm, parse_results_csv};
use super::types::*;

/// File name the experiment runner writes per peer
pub const RESULTS_FILE: &str = "results.csv";

/// Recursively find every `results.csv` below `root`, sorted by path
pub fn find_result_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.file_name().map_or(false, |name| name == RESULTS_FILE) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Average every result file below `root`
pub fn aggregate_results(root: &Path) -> Result<Vec<AlgorithmAverage>> {
    let files = find_result_files(root)?;
    log::info!("Aggregating {} result files under {}", files.len(), root.display());

    let mut records = Vec::new();
    for path in &files {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let rows = parse_results_csv(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("{}: {} rows", path.display(), rows.len());
        records.extend(rows);
    }

    Ok(average_by_algorithm(&records))
}

/// Render the `results.log` lines for one Sybil region size
pub fn format_results_log(region_size: usize, averages: &[AlgorithmAverage]) -> String {
    averages
        .iter()
        .map(|avg| {
            format!(
                "{},{:.6},{:.6},{}\n",
                region_size,
                avg.avg_rank_ratio,
                avg.avg_value_ratio,
                avg.algorithm.name()
            )
        })
        .collect()
}

pub fn write_results_log(region_size: usize, averages: &[AlgorithmAverage], output_path: &Path) -> Result<()> {
    fs::write(output_path, format_results_log(region_size, averages))
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    log::info!("Aggregated results written to {}", output_path.display());
    Ok(())
}
