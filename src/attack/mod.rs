//! Adversarial transaction generators.

pub mod sybil;

pub use sybil::{inject, inject_into, AttackConfig, SybilAttack};
