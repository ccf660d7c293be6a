//! Core data types for robustness analysis.

use serde::{Deserialize, Serialize};

use crate::attack::AttackConfig;
use crate::graph::ReciprocalFlow;
use crate::rank::{Algorithm, PageRankConfig, RankingParams};

/// What to do when a compromised identity had no reputation before the attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroScorePolicy {
    /// Report `UndefinedRatio`
    #[default]
    Fail,
    /// Leave the identity out of the averages
    Skip,
}

/// Everything one robustness measurement depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationParams {
    pub solver: PageRankConfig,
    pub reciprocal_flow: ReciprocalFlow,
    pub attack: AttackConfig,
    pub zero_score_policy: ZeroScorePolicy,
}

impl EvaluationParams {
    pub fn ranking(&self) -> RankingParams {
        RankingParams {
            solver: self.solver,
            reciprocal_flow: self.reciprocal_flow,
        }
    }
}

/// Before/after comparison for one compromised identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompromisedOutcome {
    pub identity: String,
    pub original_rank: usize,
    pub new_rank: usize,
    pub original_score: f64,
    pub new_score: f64,
    pub rank_ratio: f64,
    pub value_ratio: f64,
}

/// Averaged effect of one attack under one algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobustnessReport {
    /// Mean of `original_rank / new_rank`
    pub rank_ratio: f64,
    /// Mean of `new_score / original_score`
    pub value_ratio: f64,
    pub outcomes: Vec<CompromisedOutcome>,
    /// Identities left out under [`ZeroScorePolicy::Skip`]
    pub skipped: Vec<String>,
}

/// One row of `results.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Seed identity the trial was evaluated from
    pub identity: String,
    pub rank_ratio: f64,
    pub value_ratio: f64,
    pub algorithm: Algorithm,
}

/// A trial, or one algorithm of a trial, that did not produce a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialFailure {
    pub identity: String,
    /// `None` when the attack itself could not be built
    pub algorithm: Option<Algorithm>,
    pub error: String,
}

/// Mean ratios of one algorithm across many records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmAverage {
    pub algorithm: Algorithm,
    pub avg_rank_ratio: f64,
    pub avg_value_ratio: f64,
    pub samples: usize,
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub analysis_timestamp: String,
    pub transaction_log: String,
    pub total_transactions: usize,
    pub total_identities: usize,
    pub region_size: usize,
    pub num_compromised: usize,
    pub rng_seed: u64,
}

/// JSON summary of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub metadata: RunMetadata,
    pub averages: Vec<AlgorithmAverage>,
    pub trials_completed: usize,
    pub failures: Vec<TrialFailure>,
}
