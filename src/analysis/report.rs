//! Result files.
//!
//! `results.csv` holds one `identity,rank_ratio,value_ratio,algorithm_name`
//! row per trial and algorithm. A JSON summary and a console summary are
//! generated from the same records.

use std::fs;
use std::io::BufRead;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::error::ReputationError;
use crate::rank::Algorithm;

use super::types::*;

/// Write trial records as headerless CSV
pub fn write_results_csv(records: &[TrialRecord], output_path: &Path) -> Result<()> {
    let mut content = String::new();
    for record in records {
        content.push_str(&format_record(record));
        content.push('\n');
    }

    fs::write(output_path, content)
        .with_context(|| format!("Failed to write results to {}", output_path.display()))?;

    log::info!("{} result rows written to {}", records.len(), output_path.display());
    Ok(())
}

pub fn format_record(record: &TrialRecord) -> String {
    format!(
        "{},{},{},{}",
        record.identity,
        record.rank_ratio,
        record.value_ratio,
        record.algorithm.name()
    )
}

/// Parse rows previously written by [`write_results_csv`]
pub fn parse_results_csv<R: BufRead>(reader: R) -> Result<Vec<TrialRecord>, ReputationError> {
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| ReputationError::Io {
            path: Default::default(),
            source,
        })?;
        if line.is_empty() {
            continue;
        }

        let malformed = |reason: String| ReputationError::DataFormat { line: idx + 1, reason };
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 4 {
            return Err(malformed(format!("expected 4 fields, found {}", parts.len())));
        }

        let rank_ratio: f64 = parts[1]
            .parse()
            .map_err(|_| malformed(format!("rank ratio '{}' is not a number", parts[1])))?;
        let value_ratio: f64 = parts[2]
            .parse()
            .map_err(|_| malformed(format!("value ratio '{}' is not a number", parts[2])))?;
        let algorithm = Algorithm::from_name(parts[3])
            .ok_or_else(|| malformed(format!("unknown algorithm '{}'", parts[3])))?;

        records.push(TrialRecord {
            identity: parts[0].to_string(),
            rank_ratio,
            value_ratio,
            algorithm,
        });
    }

    Ok(records)
}

/// Mean rank and value ratio per algorithm, in [`Algorithm::ALL`] order.
///
/// Algorithms without records are left out.
pub fn average_by_algorithm(records: &[TrialRecord]) -> Vec<AlgorithmAverage> {
    Algorithm::ALL
        .into_iter()
        .filter_map(|algorithm| {
            let rows: Vec<&TrialRecord> = records.iter().filter(|r| r.algorithm == algorithm).collect();
            if rows.is_empty() {
                return None;
            }
            let n = rows.len() as f64;
            Some(AlgorithmAverage {
                algorithm,
                avg_rank_ratio: rows.iter().map(|r| r.rank_ratio).sum::<f64>() / n,
                avg_value_ratio: rows.iter().map(|r| r.value_ratio).sum::<f64>() / n,
                samples: rows.len(),
            })
        })
        .collect()
}

/// Generate JSON summary
pub fn write_json_summary(summary: &RunSummary, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .context("Failed to serialize run summary to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON summary to {}", output_path.display()))?;

    log::info!("JSON summary written to {}", output_path.display());
    Ok(())
}

/// Print summary to console
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("            SYBIL ROBUSTNESS SUMMARY");
    println!("{}", "=".repeat(60));
    println!();
    println!("Transactions:     {}", summary.metadata.total_transactions);
    println!("Identities:       {}", summary.metadata.total_identities);
    println!(
        "Attack:           {} compromised x {} Sybils",
        summary.metadata.num_compromised, summary.metadata.region_size
    );
    println!(
        "Trials:           {} completed, {} failures",
        summary.trials_completed,
        summary.failures.len()
    );
    println!();
    println!("{:<24} {:>12} {:>12}", "Algorithm", "Rank ratio", "Value ratio");
    for avg in &summary.averages {
        println!(
            "{:<24} {:>12.4} {:>12.4}",
            avg.algorithm.name(),
            avg.avg_rank_ratio,
            avg.avg_value_ratio
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn record(identity: &str, rank: f64, value: f64, algorithm: Algorithm) -> TrialRecord {
        TrialRecord {
            identity: identity.to_string(),
            rank_ratio: rank,
            value_ratio: value,
            algorithm,
        }
    }

    #[test]
    fn test_record_format() {
        let row = format_record(&record("peer7", 2.5, 0.125, Algorithm::PersonalisedPageRank));
        assert_eq!(row, "peer7,2.5,0.125,Personalised PageRank");
    }

    #[test]
    fn test_csv_file_is_readable_back() {
        let records = vec![
            record("a", 1.0, 1.0, Algorithm::PageRank),
            record("a", 3.0, 12.5, Algorithm::TemporalPageRank),
        ];
        let file = NamedTempFile::new().unwrap();
        write_results_csv(&records, file.path()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let parsed = parse_results_csv(Cursor::new(content)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let err = parse_results_csv(Cursor::new("a,1,1,EigenTrust\n")).unwrap_err();
        assert!(matches!(err, ReputationError::DataFormat { line: 1, .. }));
    }

    #[test]
    fn test_average_by_algorithm() {
        let records = vec![
            record("a", 1.0, 2.0, Algorithm::PageRank),
            record("b", 3.0, 4.0, Algorithm::PageRank),
            record("a", 0.5, 1.0, Algorithm::TemporalPageRank),
        ];
        let averages = average_by_algorithm(&records);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].algorithm, Algorithm::PageRank);
        assert_eq!(averages[0].avg_rank_ratio, 2.0);
        assert_eq!(averages[0].avg_value_ratio, 3.0);
        assert_eq!(averages[0].samples, 2);
        assert_eq!(averages[1].algorithm, Algorithm::TemporalPageRank);
    }
}
