//! Undirected identity graph.

use crate::error::{ReputationError, Result};
use crate::ledger::{Identity, Transaction};

use super::{Adjacency, WeightedGraph};

/// Undirected weighted graph over identities.
///
/// Each undirected edge is stored as two half-edges of equal weight; the
/// weight is the total value exchanged between the pair in either direction.
#[derive(Debug, Clone, Default)]
pub struct PlainGraph {
    adjacency: Adjacency<Identity>,
}

impl PlainGraph {
    /// Total value exchanged between `a` and `b`
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.adjacency.edge_weight(&a.to_string(), &b.to_string())
    }

    pub fn identity_count(&self) -> usize {
        self.adjacency.len()
    }
}

impl WeightedGraph for PlainGraph {
    type Node = Identity;

    fn adjacency(&self) -> &Adjacency<Identity> {
        &self.adjacency
    }
}

/// Build the plain interaction graph
pub fn build_plain_graph(transactions: &[Transaction]) -> Result<PlainGraph> {
    let mut adjacency = Adjacency::new();

    for tx in transactions {
        if tx.is_self_transaction() {
            return Err(ReputationError::InvalidTransaction {
                sequence: tx.sequence,
                reason: format!("{} transacts with itself", tx.from_id),
            });
        }
        adjacency.add_edge(tx.from_id.clone(), tx.to_id.clone(), tx.value);
        adjacency.add_edge(tx.to_id.clone(), tx.from_id.clone(), tx.value);
    }

    log::debug!(
        "Built plain graph: {} identities, {} half-edges",
        adjacency.len(),
        adjacency.edge_count()
    );
    Ok(PlainGraph { adjacency })
}
