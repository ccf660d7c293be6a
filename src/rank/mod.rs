//! PageRank solver and the reputation variants built on it.

pub mod pagerank;
pub mod variants;

pub use pagerank::{solve, PageRankConfig};
pub use variants::{compute_reputation, Algorithm, Ranking, RankingParams};
