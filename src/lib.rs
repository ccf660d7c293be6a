//! # Repsim - Sybil robustness of PageRank-family reputation
//!
//! This library measures how much a Sybil attacker can gain under three
//! reputation algorithms computed over a log of value transfers.
//!
//! ## Overview
//!
//! An attacker compromises existing identities and backdates transactions
//! from each of them to a region of freshly created fake identities. The
//! library ranks every identity before and after the injection and reports
//! how far the compromised identities moved.
//!
//! ## Key Features
//!
//! - **Three algorithms**: global PageRank, personalised PageRank and a
//!   temporal PageRank over a time-expanded graph
//! - **Deterministic attacks**: every random choice comes from a caller-seeded generator
//! - **Parallel trials**: one trial per seed identity, spread over rayon's pool
//! - **Aggregation**: per-peer result files averaged into one log per region size
//!
//! ## Architecture
//!
//! - `ledger`: transaction type and log loading
//! - `graph`: plain and temporal interaction graphs over a shared adjacency
//! - `rank`: power-iteration solver and the three ranking variants
//! - `attack`: Sybil region injection
//! - `analysis`: robustness measurement, result files and aggregation
//! - `config` / `config_loader`: YAML configuration and CLI overrides
//! - `orchestrator`: parallel experiment runner
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use repsim::{analysis, config_loader, ledger, orchestrator};
//!
//! let config = config_loader::load_config(Path::new("experiment.yaml"))?;
//! let transactions = ledger::load(Path::new("transactions.csv"))?;
//!
//! let outcome = orchestrator::run_experiment(&transactions, &config)?;
//! analysis::write_results_csv(&outcome.records, Path::new("results.csv"))?;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! The engine reports failures through [`error::ReputationError`]. File glue
//! and the binaries wrap these in `color_eyre` reports with context.

pub mod error;
pub mod config;
pub mod config_loader;

pub mod ledger;
pub mod graph;
pub mod rank;
pub mod attack;
pub mod analysis;
pub mod orchestrator;

pub use error::{ReputationError, Result};
