//! In-circuit recomputation of accumulator paths.
//!
//! The pairing convention is the one used by `IncrementalMerkleTree::insert`:
//! bit `l` of the leaf index set means the path node is the right child at
//! level `l`.

use ark_bn254::Fr;
use ark_r1cs_std::{boolean::Boolean, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::proof::MerkleProof;
use crate::poseidon::poseidon_hash_two_var;

/// Circuit variables for a Merkle path: index bits plus sibling hashes.
#[derive(Clone)]
pub struct MerkleProofVar {
    /// Sibling hashes from leaf level upwards
    siblings: Vec<FpVar<Fr>>,

    /// Little-endian bits of the leaf index
    index_bits: Vec<Boolean<Fr>>,
}

impl MerkleProofVar {
    /// Allocate a native proof as witness variables.
    pub fn new_witness(
        cs: ConstraintSystemRef<Fr>,
        proof: &MerkleProof<Fr>,
    ) -> Result<Self, SynthesisError> {
        let siblings = proof
            .siblings()
            .iter()
            .map(|h| FpVar::new_witness(cs.clone(), || Ok(*h)))
            .collect::<Result<Vec<_>, _>>()?;

        let index_bits = proof
            .path_indices()
            .into_iter()
            .map(|bit| Boolean::new_witness(cs.clone(), || Ok(bit)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            siblings,
            index_bits,
        })
    }

    pub fn siblings(&self) -> &[FpVar<Fr>] {
        &self.siblings
    }

    pub fn index_bits(&self) -> &[Boolean<Fr>] {
        &self.index_bits
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Leaf index recomposed from its bits.
    pub fn index(&self) -> Result<FpVar<Fr>, SynthesisError> {
        Boolean::le_bits_to_fp_var(&self.index_bits)
    }
}

/// Compute the root reached from `leaf` along `proof`.
pub fn compute_root_from_path(
    cs: ConstraintSystemRef<Fr>,
    leaf: &FpVar<Fr>,
    proof: &MerkleProofVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut current = leaf.clone();

    for (sibling, is_right) in proof.siblings.iter().zip(proof.index_bits.iter()) {
        let left = is_right.select(sibling, &current)?;
        let right = is_right.select(&current, sibling)?;

        current = poseidon_hash_two_var(cs.clone(), &left, &right)?;
    }

    Ok(current)
}

/// Constrain `leaf` to be a member of the tree with root `expected_root`.
pub fn verify_membership(
    cs: ConstraintSystemRef<Fr>,
    expected_root: &FpVar<Fr>,
    leaf: &FpVar<Fr>,
    proof: &MerkleProofVar,
) -> Result<(), SynthesisError> {
    let computed_root = compute_root_from_path(cs, leaf, proof)?;
    computed_root.enforce_equal(expected_root)
}
