//! Append-only Merkle accumulator for membership witnesses.
//!
//! This module provides:
//! - The accumulator itself (insert, index lookup, proof generation)
//! - Path verification with the same pairing convention as insertion
//! - In-circuit path verification gadgets over Poseidon

mod digest;
mod error;
mod gadgets;
mod proof;
mod tree;


pub use digest::{FieldDigest, NodeHasher};
pub use error::MerkleError;
pub use gadgets::{compute_root_from_path, verify_membership, MerkleProofVar};
pub use proof::{compute_root, verify_path, MerkleProof};
pub use tree::{AccumulatorState, IncrementalMerkleTree, ARITY, DEFAULT_DEPTH, MAX_DEPTH};
