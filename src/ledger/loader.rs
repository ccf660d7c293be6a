//! Transaction log parsing.
//!
//! The log is plain text, one `from_id,to_id,value,sequence` record per line,
//! without a header. Parsing is all-or-nothing: the first malformed line
//! aborts the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ReputationError, Result};

use super::types::Transaction;

/// Load a transaction log from disk, sorted by sequence
pub fn load(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path).map_err(|source| ReputationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(64 * 1024, file);

    let transactions = parse_transactions(reader).map_err(|e| match e {
        ReputationError::Io { source, .. } => ReputationError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    log::info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Parse a transaction log from any buffered reader, sorted by sequence.
///
/// The sort is stable, so transactions sharing a sequence keep input order.
pub fn parse_transactions<R: BufRead>(reader: R) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| ReputationError::Io {
            path: Default::default(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        transactions.push(parse_line(&line, idx + 1)?);
    }

    transactions.sort_by_key(|tx| tx.sequence);
    Ok(transactions)
}

fn parse_line(line: &str, line_no: usize) -> Result<Transaction> {
    let malformed = |reason: String| ReputationError::DataFormat {
        line: line_no,
        reason,
    };

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(malformed(format!("expected 4 fields, found {}", parts.len())));
    }

    let (from_id, to_id) = (parts[0], parts[1]);
    if from_id.is_empty() || to_id.is_empty() {
        return Err(malformed("empty identity".to_string()));
    }

    let value: f64 = parts[2]
        .parse()
        .map_err(|_| malformed(format!("value '{}' is not a number", parts[2])))?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed(format!("value {} must be finite and non-negative", value)));
    }

    let sequence: i64 = parts[3]
        .parse()
        .map_err(|_| malformed(format!("sequence '{}' is not an integer", parts[3])))?;

    Ok(Transaction::new(from_id, to_id, value, sequence))
}
