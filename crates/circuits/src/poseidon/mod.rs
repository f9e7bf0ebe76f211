//! Poseidon hash over BN254.
//!
//! The native hasher feeds the Merkle accumulator and leaf derivation; the
//! gadgets recompute the same values inside the membership circuit.

mod config;
mod gadgets;
mod native;


pub use config::{poseidon_config, ALPHA, CAPACITY, FULL_ROUNDS, PARTIAL_ROUNDS, RATE};
pub use gadgets::{poseidon_hash_many_var, poseidon_hash_two_var, poseidon_hash_var};
pub use native::{poseidon_hash, poseidon_hash_many, poseidon_hash_two, PoseidonHasher};
