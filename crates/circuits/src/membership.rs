//! Survey membership circuit.
//!
//! Proves knowledge of `(secret, uuid)` such that `hash([secret, uuid])` is a
//! leaf of the accumulator with root `merkle_root`, and that
//! `nullifier = hash([secret, uuid, survey_id])`.
//!
//! Public inputs, in allocation order: `merkle_root`, `survey_id`, `nullifier`.
//! Private: `secret`, `uuid`, `merkle_index` (as bits) and `merkle_proof`.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::commitment::{leaf_commitment_var, nullifier_var, zero_leaf};
use crate::merkle::{
    verify_membership, IncrementalMerkleTree, MerkleError, MerkleProof, MerkleProofVar,
    DEFAULT_DEPTH,
};
use crate::poseidon::PoseidonHasher;

/// Accumulator of survey participants.
pub type MembershipTree = IncrementalMerkleTree<PoseidonHasher>;

/// Empty participant tree padded with `hash([0])`.
pub fn membership_tree(depth: usize) -> Result<MembershipTree, MerkleError> {
    IncrementalMerkleTree::new(depth, PoseidonHasher::new(), zero_leaf())
}

/// Public inputs in the order the circuit allocates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MembershipPublicInputs {
    pub merkle_root: Fr,
    pub survey_id: Fr,
    pub nullifier: Fr,
}

impl MembershipPublicInputs {
    pub fn to_vec(&self) -> Vec<Fr> {
        vec![self.merkle_root, self.survey_id, self.nullifier]
    }

    /// Inverse of `to_vec`. Returns `None` unless exactly three elements are given.
    pub fn from_slice(inputs: &[Fr]) -> Option<Self> {
        match inputs {
            [merkle_root, survey_id, nullifier] => Some(Self {
                merkle_root: *merkle_root,
                survey_id: *survey_id,
                nullifier: *nullifier,
            }),
            _ => None,
        }
    }
}

/// Membership circuit for one survey response.
#[derive(Clone)]
pub struct MembershipCircuit {
    // Public inputs
    pub merkle_root: Option<Fr>,
    pub survey_id: Option<Fr>,
    pub nullifier: Option<Fr>,

    // Witnesses
    pub secret: Option<Fr>,
    pub uuid: Option<Fr>,
    /// Path for the participant's leaf; carries `merkle_index`
    pub proof: MerkleProof<Fr>,
}

impl MembershipCircuit {
    /// Circuit with dummy values for key generation at `DEFAULT_DEPTH`.
    pub fn empty() -> Self {
        Self::empty_with_depth(DEFAULT_DEPTH)
    }

    /// Circuit with dummy values for key generation.
    /// Only the shape matters; the depth fixes the number of path levels.
    pub fn empty_with_depth(depth: usize) -> Self {
        let dummy_proof = MerkleProof::new(0, vec![Fr::zero(); depth], Fr::zero());

        Self {
            merkle_root: Some(Fr::zero()),
            survey_id: Some(Fr::zero()),
            nullifier: Some(Fr::zero()),
            secret: Some(Fr::zero()),
            uuid: Some(Fr::zero()),
            proof: dummy_proof,
        }
    }

    /// Circuit with a full witness.
    pub fn new(
        secret: Fr,
        uuid: Fr,
        survey_id: Fr,
        nullifier: Fr,
        proof: MerkleProof<Fr>,
    ) -> Self {
        Self {
            merkle_root: Some(*proof.root()),
            survey_id: Some(survey_id),
            nullifier: Some(nullifier),
            secret: Some(secret),
            uuid: Some(uuid),
            proof,
        }
    }

    pub fn depth(&self) -> usize {
        self.proof.depth()
    }

    /// Public inputs for verification, if all are assigned.
    pub fn public_inputs(&self) -> Option<MembershipPublicInputs> {
        Some(MembershipPublicInputs {
            merkle_root: self.merkle_root?,
            survey_id: self.survey_id?,
            nullifier: self.nullifier?,
        })
    }
}

impl ConstraintSynthesizer<Fr> for MembershipCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // === Public inputs ===
        let root_var = FpVar::new_input(cs.clone(), || {
            self.merkle_root.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let survey_id_var = FpVar::new_input(cs.clone(), || {
            self.survey_id.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let nullifier_input = FpVar::new_input(cs.clone(), || {
            self.nullifier.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Witnesses ===
        let secret_var = FpVar::new_witness(cs.clone(), || {
            self.secret.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let uuid_var = FpVar::new_witness(cs.clone(), || {
            self.uuid.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let proof_var = MerkleProofVar::new_witness(cs.clone(), &self.proof)?;

        // === Constraint 1: the participant's leaf is in the tree ===
        let leaf_var = leaf_commitment_var(cs.clone(), &secret_var, &uuid_var)?;
        verify_membership(cs.clone(), &root_var, &leaf_var, &proof_var)?;

        // === Constraint 2: the nullifier is bound to this survey ===
        let computed_nullifier = nullifier_var(cs, &secret_var, &uuid_var, &survey_id_var)?;
        computed_nullifier.enforce_equal(&nullifier_input)?;

        Ok(())
    }
}
