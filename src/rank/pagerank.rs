//! Power-iteration PageRank over any [`WeightedGraph`].
//!
//! Transition probabilities come from row-normalising out-weights. Nodes
//! without outgoing weight are dangling; their mass is handed to the restart
//! (personalization) distribution on every step.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReputationError, Result};
use crate::graph::WeightedGraph;

/// Solver parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Probability of following an edge rather than restarting
    pub damping: f64,
    /// Iteration budget; exhausting it is an error
    pub max_iter: u32,
    /// Per-node convergence tolerance; the L1 threshold is `N * tol`
    pub tol: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iter: 100,
            tol: 1.0e-6,
        }
    }
}

impl PageRankConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(format!("damping must be within [0, 1], got {}", self.damping));
        }
        if !(self.tol > 0.0) {
            return Err(format!("tol must be positive, got {}", self.tol));
        }
        if self.max_iter == 0 {
            return Err("max_iter must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Compute stationary scores for every node of `graph`.
///
/// Without a personalization vector the restart distribution is uniform.
/// A supplied vector may omit nodes (weight 0) and is renormalised to sum 1.
pub fn solve<G: WeightedGraph>(
    graph: &G,
    config: &PageRankConfig,
    personalization: Option<&HashMap<G::Node, f64>>,
) -> Result<HashMap<G::Node, f64>> {
    let adj = graph.adjacency();
    let n = adj.len();
    if n == 0 {
        return Ok(HashMap::new());
    }

    // Inverse out-weight per row, 0.0 marks a dangling node
    let inv_out: Vec<f64> = (0..n)
        .map(|i| {
            let total: f64 = adj.out_edges(i).iter().map(|(_, w)| w).sum();
            if total > 0.0 { 1.0 / total } else { 0.0 }
        })
        .collect();
    let dangling: Vec<usize> = (0..n).filter(|&i| inv_out[i] == 0.0).collect();

    let uniform = 1.0 / n as f64;
    let restart = match personalization {
        None => vec![uniform; n],
        Some(weights) => restart_vector(graph, weights)?,
    };

    let d = config.damping;
    let threshold = n as f64 * config.tol;
    let mut x = vec![uniform; n];
    let mut residual = f64::INFINITY;

    for iteration in 1..=config.max_iter {
        let dangling_mass: f64 = dangling.iter().map(|&i| x[i]).sum();

        let mut next = vec![0.0_f64; n];
        for (i, &mass) in x.iter().enumerate() {
            if inv_out[i] == 0.0 || mass == 0.0 {
                continue;
            }
            let share = mass * inv_out[i];
            for &(j, w) in adj.out_edges(i) {
                next[j] += share * w;
            }
        }
        for (j, value) in next.iter_mut().enumerate() {
            *value = d * (*value + dangling_mass * restart[j]) + (1.0 - d) * restart[j];
        }

        residual = x.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if residual < threshold {
            log::trace!("PageRank converged after {} iterations over {} nodes", iteration, n);
            return Ok(adj.nodes().iter().cloned().zip(x).collect());
        }
    }

    Err(ReputationError::Convergence {
        iterations: config.max_iter,
        residual,
    })
}

fn restart_vector<G: WeightedGraph>(graph: &G, weights: &HashMap<G::Node, f64>) -> Result<Vec<f64>> {
    let adj = graph.adjacency();
    let mut p = vec![0.0_f64; adj.len()];

    for (node, &weight) in weights {
        let idx = adj
            .index_of(node)
            .ok_or_else(|| ReputationError::unknown(format!("{:?}", node)))?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(ReputationError::InvalidPersonalization {
                node: format!("{:?}", node),
                weight,
            });
        }
        p[idx] = weight;
    }

    let total: f64 = p.iter().sum();
    if total == 0.0 {
        return Err(ReputationError::EmptyPersonalization);
    }
    for value in &mut p {
        *value /= total;
    }
    Ok(p)
}
