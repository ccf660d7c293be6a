//! Time-expanded interaction graph.
//!
//! Every identity is split into one node per participation: `(A, k)` is the
//! state of `A` just before its k-th transaction. Edges only go from local
//! step k to step k+1, so the graph is acyclic across time and an identity's
//! reputation can never flow back into its own past.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReputationError, Result};
use crate::ledger::{Identity, Transaction};

use super::{Adjacency, WeightedGraph};

/// State of an identity immediately before its `local_seq`-th transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemporalNode {
    identity: Identity,
    local_seq: u64,
}

impl TemporalNode {
    pub fn new(identity: impl Into<Identity>, local_seq: u64) -> Self {
        Self {
            identity: identity.into(),
            local_seq,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn local_seq(&self) -> u64 {
        self.local_seq
    }

    fn next(&self) -> Self {
        Self::new(self.identity.clone(), self.local_seq + 1)
    }
}

impl fmt::Display for TemporalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity, self.local_seq)
    }
}

/// How value flowing back from responder to requester is modelled.
///
/// The log only records what A sent to B. `EqualValue` assumes B returned
/// goods of equal worth and adds the `B -> A` edge; `Omit` only keeps
/// observed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReciprocalFlow {
    #[default]
    EqualValue,
    Omit,
}

/// Directed, forward-in-time graph over [`TemporalNode`]s
#[derive(Debug, Clone, Default)]
pub struct TemporalGraph {
    adjacency: Adjacency<TemporalNode>,
    steps: HashMap<Identity, u64>,
}

impl TemporalGraph {
    /// All temporal nodes belonging to `identity`, in local order
    pub fn nodes_of(&self, identity: &str) -> Vec<TemporalNode> {
        match self.steps.get(identity) {
            Some(&last) => (1..=last).map(|k| TemporalNode::new(identity, k)).collect(),
            None => Vec::new(),
        }
    }

    pub fn identity_count(&self) -> usize {
        self.steps.len()
    }
}

impl WeightedGraph for TemporalGraph {
    type Node = TemporalNode;

    fn adjacency(&self) -> &Adjacency<TemporalNode> {
        &self.adjacency
    }
}

/// Single-use builder that tracks each identity's local step counter.
///
/// Consumed by [`TemporalGraphBuilder::build`]; the counters never outlive one
/// graph.
#[derive(Debug)]
pub struct TemporalGraphBuilder {
    policy: ReciprocalFlow,
    last_seq: HashMap<Identity, u64>,
    adjacency: Adjacency<TemporalNode>,
}

impl TemporalGraphBuilder {
    pub fn new(policy: ReciprocalFlow) -> Self {
        Self {
            policy,
            last_seq: HashMap::new(),
            adjacency: Adjacency::new(),
        }
    }

    fn current(&mut self, identity: &Identity) -> TemporalNode {
        let step = *self.last_seq.entry(identity.clone()).or_insert(1);
        TemporalNode::new(identity.clone(), step)
    }

    fn push(&mut self, tx: &Transaction) -> Result<()> {
        if tx.is_self_transaction() {
            return Err(ReputationError::InvalidTransaction {
                sequence: tx.sequence,
                reason: format!("{} transacts with itself", tx.from_id),
            });
        }

        let requester = self.current(&tx.from_id);
        let responder = self.current(&tx.to_id);
        let value = tx.value;

        self.adjacency.add_edge(requester.clone(), requester.next(), value);
        self.adjacency.add_edge(requester.clone(), responder.next(), value);
        self.adjacency.add_edge(responder.clone(), responder.next(), value);
        if self.policy == ReciprocalFlow::EqualValue {
            self.adjacency.add_edge(responder.clone(), requester.next(), value);
        }

        for identity in [&tx.from_id, &tx.to_id] {
            if let Some(step) = self.last_seq.get_mut(identity) {
                *step += 1;
            }
        }
        Ok(())
    }

    /// Feed `transactions` in order and return the finished graph
    pub fn build(mut self, transactions: &[Transaction]) -> Result<TemporalGraph> {
        for tx in transactions {
            self.push(tx)?;
        }

        log::debug!(
            "Built temporal graph: {} nodes, {} edges, {} identities ({:?} reciprocal flow)",
            self.adjacency.len(),
            self.adjacency.edge_count(),
            self.last_seq.len(),
            self.policy
        );
        Ok(TemporalGraph {
            adjacency: self.adjacency,
            steps: self.last_seq,
        })
    }
}

/// Build the temporal graph from a sorted transaction log
pub fn build_temporal_graph(transactions: &[Transaction], policy: ReciprocalFlow) -> Result<TemporalGraph> {
    TemporalGraphBuilder::new(policy).build(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, k: u64) -> TemporalNode {
        TemporalNode::new(id, k)
    }

    #[test]
    fn test_single_transaction_gadget() {
        let txs = vec![Transaction::new("a", "b", 3.0, 1)];
        let graph = build_temporal_graph(&txs, ReciprocalFlow::EqualValue).unwrap();
        let adj = graph.adjacency();

        assert_eq!(adj.len(), 4);
        assert_eq!(adj.edge_count(), 4);
        assert_eq!(adj.edge_weight(&node("a", 1), &node("a", 2)), Some(3.0));
        assert_eq!(adj.edge_weight(&node("a", 1), &node("b", 2)), Some(3.0));
        assert_eq!(adj.edge_weight(&node("b", 1), &node("b", 2)), Some(3.0));
        assert_eq!(adj.edge_weight(&node("b", 1), &node("a", 2)), Some(3.0));
    }

    #[test]
    fn test_omit_policy_drops_reverse_flow() {
        let txs = vec![Transaction::new("a", "b", 3.0, 1)];
        let graph = build_temporal_graph(&txs, ReciprocalFlow::Omit).unwrap();
        let adj = graph.adjacency();

        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.edge_weight(&node("b", 1), &node("a", 2)), None);
    }

    #[test]
    fn test_local_counters_advance_per_participation() {
        let txs = vec![
            Transaction::new("a", "b", 1.0, 1),
            Transaction::new("b", "c", 2.0, 2),
            Transaction::new("a", "c", 5.0, 3),
        ];
        let graph = build_temporal_graph(&txs, ReciprocalFlow::EqualValue).unwrap();
        let adj = graph.adjacency();

        // b is at step 2 for its second transaction, c at step 1
        assert_eq!(adj.edge_weight(&node("b", 2), &node("c", 2)), Some(2.0));
        // a at step 2, c at step 2 for the third
        assert_eq!(adj.edge_weight(&node("a", 2), &node("c", 3)), Some(5.0));
        assert_eq!(adj.edge_weight(&node("c", 2), &node("a", 3)), Some(5.0));

        assert_eq!(graph.nodes_of("a"), vec![node("a", 1), node("a", 2), node("a", 3)]);
        assert_eq!(graph.nodes_of("c").len(), 3);
        assert!(graph.nodes_of("z").is_empty());
        assert_eq!(graph.identity_count(), 3);
    }

    #[test]
    fn test_edges_only_move_forward() {
        let txs = vec![
            Transaction::new("a", "b", 1.0, 1),
            Transaction::new("b", "a", 1.0, 2),
            Transaction::new("a", "b", 1.0, 3),
            Transaction::new("c", "a", 1.0, 4),
        ];
        let graph = build_temporal_graph(&txs, ReciprocalFlow::EqualValue).unwrap();
        let adj = graph.adjacency();

        for (idx, source) in adj.nodes().iter().enumerate() {
            for &(target, _) in adj.out_edges(idx) {
                assert_eq!(adj.nodes()[target].local_seq(), source.local_seq() + 1);
            }
        }
    }

    #[test]
    fn test_self_transaction_rejected() {
        let txs = vec![Transaction::new("a", "a", 1.0, 4)];
        assert!(matches!(
            build_temporal_graph(&txs, ReciprocalFlow::EqualValue),
            Err(ReputationError::InvalidTransaction { sequence: 4, .. })
        ));
    }

    #[test]
    fn test_temporal_node_display() {
        assert_eq!(node("alice", 3).to_string(), "alice@3");
    }
}
