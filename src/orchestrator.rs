//! Experiment runner.
//!
//! Samples seed identities, runs one Sybil trial per seed in parallel and
//! collects the per-algorithm result rows. All randomness is drawn from one
//! master generator before the parallel section starts, so a run is
//! reproducible from `experiment.rng_seed` regardless of thread count.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::analysis::{measure_all, EvaluationParams, RobustnessReport, TrialFailure, TrialRecord};
use crate::attack::inject;
use crate::config::Config;
use crate::error::{ReputationError, Result};
use crate::ledger::{identities, Identity, Transaction};
use crate::rank::Algorithm;

/// Rows and failures of one experiment run
#[derive(Debug, Clone, Default)]
pub struct ExperimentOutcome {
    /// One row per trial and successful algorithm, in seed-sampling order
    pub records: Vec<TrialRecord>,
    pub failures: Vec<TrialFailure>,
    /// Trials that produced at least one row
    pub trials_completed: usize,
}

/// A seed identity paired with the generator seed of its trial
#[derive(Debug, Clone)]
struct Trial {
    seed_identity: Identity,
    rng_seed: u64,
}

/// Pick the seed identities and their trial seeds
fn plan_trials(transactions: &[Transaction], config: &Config) -> Vec<Trial> {
    let mut master = StdRng::seed_from_u64(config.experiment.rng_seed);

    let candidates: Vec<Identity> = identities(transactions).into_iter().collect();
    let requested = config.experiment.seed_identity_sample_size;
    if requested > candidates.len() {
        log::warn!(
            "Seed identity sample size {} exceeds the {} identities present; using all of them",
            requested,
            candidates.len()
        );
    }
    let sample_size = requested.min(candidates.len());

    let seeds: Vec<Identity> = candidates
        .choose_multiple(&mut master, sample_size)
        .cloned()
        .collect();

    seeds
        .into_iter()
        .map(|seed_identity| Trial {
            seed_identity,
            rng_seed: master.gen(),
        })
        .collect()
}

/// Reports of one trial, one entry per algorithm
type TrialReports = Vec<(Algorithm, Result<RobustnessReport>)>;

fn run_trial(trial: &Trial, transactions: &[Transaction], params: &EvaluationParams) -> Result<TrialReports> {
    let mut rng = StdRng::seed_from_u64(trial.rng_seed);
    let attack = inject(
        transactions,
        params.attack.num_compromised,
        params.attack.region_size,
        params.attack.sybil_value,
        &mut rng,
    )?;
    log::debug!(
        "Trial {}: compromised {:?}, {} fabricated transactions",
        trial.seed_identity,
        attack.compromised,
        attack.fabricated_count(transactions.len())
    );

    Ok(measure_all(&trial.seed_identity, transactions, &attack, params))
}

fn record(trial: &Trial, algorithm: Algorithm, report: &RobustnessReport) -> TrialRecord {
    TrialRecord {
        identity: trial.seed_identity.clone(),
        rank_ratio: report.rank_ratio,
        value_ratio: report.value_ratio,
        algorithm,
    }
}

fn failure(trial: &Trial, algorithm: Option<Algorithm>, error: &ReputationError) -> TrialFailure {
    match algorithm {
        Some(alg) => log::warn!("Trial for {} failed under {}: {}", trial.seed_identity, alg, error),
        None => log::warn!("Trial for {} failed: {}", trial.seed_identity, error),
    }
    TrialFailure {
        identity: trial.seed_identity.clone(),
        algorithm,
        error: error.to_string(),
    }
}

/// Run one trial per sampled seed identity.
///
/// Algorithms of a trial are recorded independently: a failing variant adds
/// a [`TrialFailure`] and leaves the other rows of the trial in place. With
/// `experiment.fail_fast` the first error of any kind aborts the run.
pub fn run_experiment(transactions: &[Transaction], config: &Config) -> Result<ExperimentOutcome> {
    let trials = plan_trials(transactions, config);
    let params = config.evaluation_params();

    log::info!(
        "Running {} trials: {} compromised identities, region size {}",
        trials.len(),
        params.attack.num_compromised,
        params.attack.region_size
    );

    let results: Vec<(&Trial, Result<TrialReports>)> = trials
        .par_iter()
        .map(|trial| (trial, run_trial(trial, transactions, &params)))
        .collect();

    let fail_fast = config.experiment.fail_fast;
    let mut outcome = ExperimentOutcome::default();
    for (trial, result) in results {
        let reports = match result {
            Ok(reports) => reports,
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                outcome.failures.push(failure(trial, None, &e));
                continue;
            }
        };

        let mut produced = false;
        for (algorithm, report) in reports {
            match report {
                Ok(report) => {
                    outcome.records.push(record(trial, algorithm, &report));
                    produced = true;
                }
                Err(e) if fail_fast => return Err(e),
                Err(e) => outcome.failures.push(failure(trial, Some(algorithm), &e)),
            }
        }
        if produced {
            outcome.trials_completed += 1;
        }
    }

    log::info!(
        "{} trials completed, {} failures",
        outcome.trials_completed,
        outcome.failures.len()
    );
    Ok(outcome)
}
