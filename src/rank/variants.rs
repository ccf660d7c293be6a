//! The three reputation algorithms compared by the robustness analysis.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReputationError, Result};
use crate::graph::{build_plain_graph, build_temporal_graph, ReciprocalFlow};
use crate::ledger::{Identity, Transaction};

use super::pagerank::{solve, PageRankConfig};

/// Reputation algorithm variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Global PageRank on the plain graph with a uniform restart
    PageRank,
    /// PageRank on the plain graph restarting at the seed identity
    PersonalisedPageRank,
    /// PageRank on the temporal graph restarting at the seed's temporal nodes
    TemporalPageRank,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::PageRank,
        Algorithm::PersonalisedPageRank,
        Algorithm::TemporalPageRank,
    ];

    /// Name used in result files
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::PageRank => "PageRank",
            Algorithm::PersonalisedPageRank => "Personalised PageRank",
            Algorithm::TemporalPageRank => "Temporal PageRank",
        }
    }

    /// Parse a result-file name back into an algorithm
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.name() == name)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    /// Accepts the short CLI spellings as well as result-file names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pagerank" | "global" => Ok(Algorithm::PageRank),
            "personalised" | "personalized" | "personalised_pagerank" | "personalized_pagerank" => {
                Ok(Algorithm::PersonalisedPageRank)
            }
            "temporal" | "temporal_pagerank" => Ok(Algorithm::TemporalPageRank),
            _ => Self::from_name(s).ok_or_else(|| format!("Unknown algorithm: {}", s)),
        }
    }
}

/// Parameters shared by every ranking run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankingParams {
    pub solver: PageRankConfig,
    pub reciprocal_flow: ReciprocalFlow,
}

/// Identities ordered by descending reputation
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    order: Vec<Identity>,
    scores: HashMap<Identity, f64>,
    positions: HashMap<Identity, usize>,
}

impl Ranking {
    /// Order `scores` by descending value, breaking ties by identity
    pub fn from_scores(scores: HashMap<Identity, f64>) -> Self {
        let mut order: Vec<Identity> = scores.keys().cloned().collect();
        order.sort_by(|a, b| {
            scores[b].total_cmp(&scores[a]).then_with(|| a.cmp(b))
        });
        let positions = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i + 1))
            .collect();
        Self {
            order,
            scores,
            positions,
        }
    }

    /// 1-based position of `identity`
    pub fn rank_of(&self, identity: &str) -> Option<usize> {
        self.positions.get(identity).copied()
    }

    pub fn score_of(&self, identity: &str) -> Option<f64> {
        self.scores.get(identity).copied()
    }

    pub fn order(&self) -> &[Identity] {
        &self.order
    }

    pub fn scores(&self) -> &HashMap<Identity, f64> {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The `n` best identities with their scores
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        self.order
            .iter()
            .take(n)
            .map(|id| (id.as_str(), self.scores[id]))
            .collect()
    }
}

/// Rank every identity in `transactions` from the point of view of `seed`.
///
/// The global variant ignores `seed`.
pub fn compute_reputation(
    algorithm: Algorithm,
    seed: &str,
    transactions: &[Transaction],
    params: &RankingParams,
) -> Result<Ranking> {
    let scores = match algorithm {
        Algorithm::PageRank => {
            let graph = build_plain_graph(transactions)?;
            solve(&graph, &params.solver, None)?
        }
        Algorithm::PersonalisedPageRank => {
            let graph = build_plain_graph(transactions)?;
            let personalization = HashMap::from([(seed.to_string(), 1.0)]);
            solve(&graph, &params.solver, Some(&personalization))?
        }
        Algorithm::TemporalPageRank => temporal_reputation(seed, transactions, params)?,
    };

    log::debug!("{} from {}: ranked {} identities", algorithm, seed, scores.len());
    Ok(Ranking::from_scores(scores))
}

fn temporal_reputation(
    seed: &str,
    transactions: &[Transaction],
    params: &RankingParams,
) -> Result<HashMap<Identity, f64>> {
    let graph = build_temporal_graph(transactions, params.reciprocal_flow)?;

    let seed_nodes = graph.nodes_of(seed);
    if seed_nodes.is_empty() {
        return Err(ReputationError::unknown(seed));
    }
    let weight = 1.0 / seed_nodes.len() as f64;
    let personalization: HashMap<_, _> = seed_nodes.into_iter().map(|node| (node, weight)).collect();

    let node_scores = solve(&graph, &params.solver, Some(&personalization))?;

    let mut sums: HashMap<Identity, f64> = HashMap::with_capacity(graph.identity_count());
    for (node, score) in node_scores {
        *sums.entry(node.identity().to_string()).or_insert(0.0) += score;
    }
    Ok(sums)
}
