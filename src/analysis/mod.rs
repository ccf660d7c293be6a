//! Sybil robustness analysis.
//!
//! This module measures how far each reputation algorithm can be pushed by a
//! Sybil attack, and turns the measurements into result files.

pub mod types;
pub mod robustness;
pub mod report;
pub mod aggregate;

pub use types::*;
pub use robustness::{compare, evaluate, measure_all, measure_attack};
pub use report::{average_by_algorithm, parse_results_csv, write_json_summary, write_results_csv};
pub use aggregate::{aggregate_results, write_results_log};
