//! Transaction store.
//!
//! Loads the chronological transaction log that every reputation computation
//! starts from.

pub mod types;
pub mod loader;

pub use types::{earliest_sequences, identities, Identity, Transaction};
pub use loader::{load, parse_transactions};
