//! Interaction graphs built from a transaction log.
//!
//! Two shapes are supported:
//! - `plain`: undirected identity graph weighted by total exchanged value
//! - `temporal`: time-expanded graph where influence only flows forward
//!
//! Both are stored as an [`Adjacency`] so the PageRank solver can run over
//! either one.

pub mod plain;
pub mod temporal;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

pub use plain::{build_plain_graph, PlainGraph};
pub use temporal::{build_temporal_graph, ReciprocalFlow, TemporalGraph, TemporalGraphBuilder, TemporalNode};

/// Weighted directed adjacency lists.
///
/// Nodes are indexed in first-seen order and so are the out-edges of each
/// node. Adding an edge that already exists accumulates its weight.
#[derive(Debug, Clone)]
pub struct Adjacency<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    out_edges: Vec<Vec<(usize, f64)>>,
    /// Per row, target index -> position in `out_edges[row]`
    slots: Vec<HashMap<usize, usize>>,
}

impl<N: Clone + Eq + Hash> Adjacency<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            out_edges: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Insert a node if absent and return its index
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(node.clone(), idx);
        self.nodes.push(node);
        self.out_edges.push(Vec::new());
        self.slots.push(HashMap::new());
        idx
    }

    /// Add `weight` to the directed edge `from -> to`
    pub fn add_edge(&mut self, from: N, to: N, weight: f64) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        let edges = &mut self.out_edges[from_idx];
        match self.slots[from_idx].entry(to_idx) {
            Entry::Occupied(slot) => edges[*slot.get()].1 += weight,
            Entry::Vacant(slot) => {
                slot.insert(edges.len());
                edges.push((to_idx, weight));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Outgoing `(target index, weight)` pairs of the node at `idx`
    pub fn out_edges(&self, idx: usize) -> &[(usize, f64)] {
        &self.out_edges[idx]
    }

    /// Weight of `from -> to`, if the edge exists
    pub fn edge_weight(&self, from: &N, to: &N) -> Option<f64> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        let slot = *self.slots[from_idx].get(&to_idx)?;
        Some(self.out_edges[from_idx][slot].1)
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(Vec::len).sum()
    }
}

impl<N: Clone + Eq + Hash> Default for Adjacency<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A graph the PageRank solver can iterate over
pub trait WeightedGraph {
    type Node: Clone + Eq + Hash + std::fmt::Debug;

    fn adjacency(&self) -> &Adjacency<Self::Node>;
}

impl<N: Clone + Eq + Hash + std::fmt::Debug> WeightedGraph for Adjacency<N> {
    type Node = N;

    fn adjacency(&self) -> &Adjacency<N> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_edges_accumulate() {
        let mut adj: Adjacency<&str> = Adjacency::new();
        adj.add_edge("a", "b", 2.0);
        adj.add_edge("a", "b", 3.0);
        adj.add_edge("b", "a", 1.0);

        assert_eq!(adj.len(), 2);
        assert_eq!(adj.edge_count(), 2);
        assert_eq!(adj.edge_weight(&"a", &"b"), Some(5.0));
        assert_eq!(adj.edge_weight(&"b", &"a"), Some(1.0));
        assert_eq!(adj.edge_weight(&"a", &"c"), None);
    }

    #[test]
    fn test_nodes_keep_first_seen_order() {
        let mut adj: Adjacency<&str> = Adjacency::new();
        adj.add_edge("z", "y", 1.0);
        adj.add_node("x");
        adj.add_node("z");
        assert_eq!(adj.nodes(), &["z", "y", "x"]);
        assert_eq!(adj.index_of(&"x"), Some(2));
        assert!(adj.out_edges(2).is_empty());
    }

    #[test]
    fn test_hub_edges_keep_insertion_order() {
        let mut adj: Adjacency<u32> = Adjacency::new();
        for round in 0..3 {
            for leaf in (1..=500).rev() {
                adj.add_edge(0, leaf, 1.0 + round as f64);
            }
        }

        assert_eq!(adj.len(), 501);
        assert_eq!(adj.edge_count(), 500);
        let hub = adj.index_of(&0).unwrap();
        let targets: Vec<u32> = adj.out_edges(hub).iter().map(|&(t, _)| adj.nodes()[t]).collect();
        assert_eq!(targets, (1..=500).rev().collect::<Vec<_>>());
        assert!(adj.out_edges(hub).iter().all(|&(_, w)| w == 6.0));
        assert_eq!(adj.edge_weight(&0, &250), Some(6.0));
        assert_eq!(adj.edge_weight(&250, &0), None);
    }
}
