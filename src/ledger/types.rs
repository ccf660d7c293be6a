//! Core ledger types.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Opaque label of a trading identity
pub type Identity = String;

/// A value-exchanging transaction between two identities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from_id: Identity,
    pub to_id: Identity,
    pub value: f64,
    /// Global chronological position; logs are kept sorted by this field
    pub sequence: i64,
}

impl Transaction {
    pub fn new(from_id: impl Into<Identity>, to_id: impl Into<Identity>, value: f64, sequence: i64) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            value,
            sequence,
        }
    }

    pub fn is_self_transaction(&self) -> bool {
        self.from_id == self.to_id
    }
}

/// All identities appearing as either endpoint, in sorted order
pub fn identities(transactions: &[Transaction]) -> BTreeSet<Identity> {
    let mut set = BTreeSet::new();
    for tx in transactions {
        set.insert(tx.from_id.clone());
        set.insert(tx.to_id.clone());
    }
    set
}

/// Sequence number of the first transaction each identity takes part in.
///
/// Assumes `transactions` is sorted by sequence.
pub fn earliest_sequences(transactions: &[Transaction]) -> HashMap<Identity, i64> {
    let mut earliest: HashMap<Identity, i64> = HashMap::new();
    for tx in transactions {
        earliest.entry(tx.from_id.clone()).or_insert(tx.sequence);
        earliest.entry(tx.to_id.clone()).or_insert(tx.sequence);
    }
    earliest
}
