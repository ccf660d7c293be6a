//! Sybil attack simulation.
//!
//! Compromised identities spawn a region of fake identities and fabricate
//! high-value transactions with them. The fabricated transactions are
//! backdated to just before the compromised identity's first genuine
//! transaction, the most favourable position for the attacker in time.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ReputationError, Result};
use crate::ledger::{earliest_sequences, identities, Identity, Transaction};

/// Attack shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Identities taken over per trial
    pub num_compromised: usize,
    /// Fake identities spawned by each compromised identity
    pub region_size: usize,
    /// Value of every fabricated transaction
    pub sybil_value: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            num_compromised: 100,
            region_size: 50,
            sybil_value: 1_000_000.0,
        }
    }
}

/// Outcome of an injection
#[derive(Debug, Clone)]
pub struct SybilAttack {
    /// Compromised identities in sampling order
    pub compromised: Vec<Identity>,
    /// Genuine plus fabricated transactions, sorted by sequence
    pub transactions: Vec<Transaction>,
}

impl SybilAttack {
    pub fn fabricated_count(&self, original_len: usize) -> usize {
        self.transactions.len() - original_len
    }
}

/// Name of the `index`-th fake identity of the `region`-th compromised identity
pub fn sybil_name(region: usize, index: usize) -> Identity {
    format!("sybil_{}_{}", region, index)
}

/// Compromise `num_compromised` identities chosen uniformly without
/// replacement and attach a Sybil region of `region_size` to each
pub fn inject<R: Rng + ?Sized>(
    transactions: &[Transaction],
    num_compromised: usize,
    region_size: usize,
    sybil_value: f64,
    rng: &mut R,
) -> Result<SybilAttack> {
    let candidates: Vec<Identity> = identities(transactions).into_iter().collect();
    if num_compromised > candidates.len() {
        return Err(ReputationError::InsufficientIdentities {
            requested: num_compromised,
            available: candidates.len(),
        });
    }

    let compromised: Vec<Identity> = candidates
        .choose_multiple(rng, num_compromised)
        .cloned()
        .collect();

    inject_into(transactions, &compromised, region_size, sybil_value)
}

/// Attach a Sybil region to each of the given identities
pub fn inject_into(
    transactions: &[Transaction],
    compromised: &[Identity],
    region_size: usize,
    sybil_value: f64,
) -> Result<SybilAttack> {
    let earliest = earliest_sequences(transactions);

    let mut augmented = Vec::with_capacity(transactions.len() + compromised.len() * region_size);
    augmented.extend_from_slice(transactions);

    for (region, identity) in compromised.iter().enumerate() {
        let first_seen = *earliest
            .get(identity)
            .ok_or_else(|| ReputationError::unknown(identity))?;

        for index in 0..region_size {
            augmented.push(Transaction::new(
                identity.clone(),
                sybil_name(region + 1, index),
                sybil_value,
                first_seen - 1,
            ));
        }
    }

    // Backdated transactions break the ordering; the stable sort restores it
    augmented.sort_by_key(|tx| tx.sequence);

    log::debug!(
        "Injected {} Sybil transactions for {} compromised identities",
        compromised.len() * region_size,
        compromised.len()
    );
    Ok(SybilAttack {
        compromised: compromised.to_vec(),
        transactions: augmented,
    })
}
