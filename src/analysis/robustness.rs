//! Sybil robustness measurement.
//!
//! Compares where compromised identities rank, and how much reputation they
//! hold, before and after their Sybil regions are injected.
//!
//! - `rank_ratio = original_rank / new_rank`: above 1 means the attack moved
//!   the identity up, below 1 means it backfired.
//! - `value_ratio = new_score / original_score`.

use rand::Rng;

use crate::attack::{inject, SybilAttack};
use crate::error::{ReputationError, Result};
use crate::ledger::Transaction;
use crate::rank::{compute_reputation, Algorithm, Ranking};

use super::types::{CompromisedOutcome, EvaluationParams, RobustnessReport, ZeroScorePolicy};

/// Run baseline, attack and attacked ranking for one algorithm
pub fn evaluate<R: Rng + ?Sized>(
    seed: &str,
    original: &[Transaction],
    params: &EvaluationParams,
    algorithm: Algorithm,
    rng: &mut R,
) -> Result<RobustnessReport> {
    let attack = inject(
        original,
        params.attack.num_compromised,
        params.attack.region_size,
        params.attack.sybil_value,
        rng,
    )?;
    measure_attack(seed, original, &attack, params, algorithm)
}

/// Score an already-built attack under `algorithm`
pub fn measure_attack(
    seed: &str,
    original: &[Transaction],
    attack: &SybilAttack,
    params: &EvaluationParams,
    algorithm: Algorithm,
) -> Result<RobustnessReport> {
    let ranking_params = params.ranking();
    let baseline = compute_reputation(algorithm, seed, original, &ranking_params)?;
    let attacked = compute_reputation(algorithm, seed, &attack.transactions, &ranking_params)?;

    let report = compare(&baseline, &attacked, &attack.compromised, params.zero_score_policy)?;
    log::debug!(
        "{} seed={} region={}: rank_ratio={:.4} value_ratio={:.4}",
        algorithm,
        seed,
        params.attack.region_size,
        report.rank_ratio,
        report.value_ratio
    );
    Ok(report)
}

/// Average rank and value ratios of `compromised` between two rankings
pub fn compare(
    baseline: &Ranking,
    attacked: &Ranking,
    compromised: &[String],
    policy: ZeroScorePolicy,
) -> Result<RobustnessReport> {
    let mut outcomes = Vec::with_capacity(compromised.len());
    let mut skipped = Vec::new();

    for identity in compromised {
        let lookup = |ranking: &Ranking| -> Result<(usize, f64)> {
            match (ranking.rank_of(identity), ranking.score_of(identity)) {
                (Some(rank), Some(score)) => Ok((rank, score)),
                _ => Err(ReputationError::unknown(identity)),
            }
        };
        let (original_rank, original_score) = lookup(baseline)?;
        let (new_rank, new_score) = lookup(attacked)?;

        if original_score == 0.0 {
            match policy {
                ZeroScorePolicy::Fail => {
                    return Err(ReputationError::UndefinedRatio {
                        identity: identity.clone(),
                    })
                }
                ZeroScorePolicy::Skip => {
                    log::warn!("Skipping {}: zero baseline score", identity);
                    skipped.push(identity.clone());
                    continue;
                }
            }
        }

        outcomes.push(CompromisedOutcome {
            identity: identity.clone(),
            original_rank,
            new_rank,
            original_score,
            new_score,
            rank_ratio: original_rank as f64 / new_rank as f64,
            value_ratio: new_score / original_score,
        });
    }

    if outcomes.is_empty() {
        return Err(ReputationError::UndefinedRatio {
            identity: skipped.first().cloned().unwrap_or_default(),
        });
    }

    let count = outcomes.len() as f64;
    let rank_ratio = outcomes.iter().map(|o| o.rank_ratio).sum::<f64>() / count;
    let value_ratio = outcomes.iter().map(|o| o.value_ratio).sum::<f64>() / count;

    Ok(RobustnessReport {
        rank_ratio,
        value_ratio,
        outcomes,
        skipped,
    })
}

/// Evaluate one attack under every algorithm, in [`Algorithm::ALL`] order.
///
/// Each algorithm succeeds or fails on its own; an error in one variant does
/// not hide the reports of the others.
pub fn measure_all(
    seed: &str,
    original: &[Transaction],
    attack: &SybilAttack,
    params: &EvaluationParams,
) -> Vec<(Algorithm, Result<RobustnessReport>)> {
    Algorithm::ALL
        .into_iter()
        .map(|alg| (alg, measure_attack(seed, original, attack, params, alg)))
        .collect()
}
