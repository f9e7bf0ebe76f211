//! Merkle accumulator and membership circuit for anonymous survey participation.
//!
//! This crate provides:
//! - `IncrementalMerkleTree`: append-only accumulator producing membership paths
//! - `PoseidonHasher`: the BN254 Poseidon hash the accumulator is built over
//! - Leaf and nullifier derivation for survey participants
//! - `MembershipCircuit`: proves a leaf is in the tree and binds a per-survey nullifier

pub mod commitment;
pub mod membership;
pub mod merkle;
pub mod poseidon;

#[cfg(test)]
mod tests;

pub use commitment::{derive_uuid, leaf_commitment, nullifier, zero_leaf};
pub use membership::{membership_tree, MembershipCircuit, MembershipPublicInputs, MembershipTree};
pub use merkle::{
    AccumulatorState, FieldDigest, IncrementalMerkleTree, MerkleError, MerkleProof, NodeHasher,
    DEFAULT_DEPTH, MAX_DEPTH,
};
pub use poseidon::PoseidonHasher;

use ark_bn254::Fr;

/// Common type aliases
pub type ConstraintF = Fr;
