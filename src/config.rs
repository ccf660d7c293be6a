use serde::{Deserialize, Serialize};

use crate::analysis::{EvaluationParams, ZeroScorePolicy};
use crate::attack::AttackConfig;
use crate::graph::ReciprocalFlow;
use crate::rank::PageRankConfig;

/// Experiment configuration, loaded from YAML.
///
/// Every section is optional; missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub solver: PageRankConfig,
    pub attack: AttackConfig,
    pub experiment: ExperimentConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.solver.validate().map_err(ValidationError::InvalidSolver)?;

        if !self.attack.sybil_value.is_finite() || self.attack.sybil_value < 0.0 {
            return Err(ValidationError::InvalidAttack(format!(
                "sybil_value must be finite and non-negative, got {}",
                self.attack.sybil_value
            )));
        }
        if self.attack.num_compromised == 0 {
            return Err(ValidationError::InvalidAttack(
                "num_compromised must be at least 1".to_string(),
            ));
        }

        if self.experiment.seed_identity_sample_size == 0 {
            return Err(ValidationError::InvalidExperiment(
                "seed_identity_sample_size must be at least 1".to_string(),
            ));
        }

        if let Some(level) = &self.general.log_level {
            if level.parse::<log::LevelFilter>().is_err() {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log level '{}'",
                    level
                )));
            }
        }

        Ok(())
    }

    /// Parameters for a single robustness measurement
    pub fn evaluation_params(&self) -> EvaluationParams {
        EvaluationParams {
            solver: self.solver,
            reciprocal_flow: self.experiment.reciprocal_flow,
            attack: self.attack,
            zero_score_policy: self.experiment.zero_score_policy,
        }
    }
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Trial sampling and policy switches
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Number of seed identities evaluated per run
    pub seed_identity_sample_size: usize,
    /// Seed of the run's random generator
    pub rng_seed: u64,
    pub reciprocal_flow: ReciprocalFlow,
    pub zero_score_policy: ZeroScorePolicy,
    /// Abort the run on the first failed trial instead of skipping it
    pub fail_fast: bool,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid solver configuration: {0}")]
    InvalidSolver(String),
    #[error("Invalid attack configuration: {0}")]
    InvalidAttack(String),
    #[error("Invalid experiment configuration: {0}")]
    InvalidExperiment(String),
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed_identity_sample_size: 1000,
            rng_seed: 0,
            reciprocal_flow: ReciprocalFlow::EqualValue,
            zero_score_policy: ZeroScorePolicy::Fail,
            fail_fast: false,
        }
    }
}
