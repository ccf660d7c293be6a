//! Error types for the reputation engine.
//!
//! Every component reports failures through [`ReputationError`]. Nothing in the
//! engine swallows these; the experiment runner decides whether a failed trial
//! aborts the batch.

use std::path::PathBuf;

/// Errors raised while loading transactions, building graphs, ranking, or
/// measuring an attack
#[derive(Debug, thiserror::Error)]
pub enum ReputationError {
    #[error("Malformed input at line {line}: {reason}")]
    DataFormat { line: usize, reason: String },

    #[error("Invalid transaction at sequence {sequence}: {reason}")]
    InvalidTransaction { sequence: i64, reason: String },

    #[error("Personalization vector sums to zero")]
    EmptyPersonalization,

    #[error("Invalid personalization weight {weight} for node {node}")]
    InvalidPersonalization { node: String, weight: f64 },

    #[error("Power iteration failed to converge in {iterations} iterations (residual {residual:e})")]
    Convergence { iterations: u32, residual: f64 },

    #[error("Unknown identity: {identity}")]
    UnknownIdentity { identity: String },

    #[error("Ratio undefined for {identity}: original score is zero")]
    UndefinedRatio { identity: String },

    #[error("Cannot sample {requested} identities, only {available} available")]
    InsufficientIdentities { requested: usize, available: usize },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReputationError {
    pub(crate) fn unknown(identity: impl ToString) -> Self {
        ReputationError::UnknownIdentity {
            identity: identity.to_string(),
        }
    }
}

pub type Result<T, E = ReputationError> = std::result::Result<T, E>;
