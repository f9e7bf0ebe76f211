//! Witness assembly and proof generation for the membership circuit.

use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use membership_circuits::{
    leaf_commitment, nullifier, MembershipCircuit, MembershipPublicInputs, MembershipTree,
    MerkleError, MerkleProof,
};

use crate::inputs::{FieldParseError, ProverInputs};

/// Errors during proof generation
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),
    #[error("Leaf commitment is not in the membership tree")]
    LeafNotFound,
    #[error("Merkle accumulator error: {0}")]
    Merkle(#[from] MerkleError),
    #[error("Invalid field element: {0}")]
    InvalidField(#[from] FieldParseError),
    #[error("Merkle path has {actual} levels, proving key expects {expected}")]
    DepthMismatch { expected: usize, actual: usize },
    #[error("Merkle index {index} does not fit a depth-{depth} tree")]
    IndexOutOfRange { index: u64, depth: usize },
    #[error("Witness does not satisfy the membership circuit")]
    Unsatisfied,
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Everything the circuit needs to prove one survey response.
#[derive(Clone, Debug)]
pub struct MembershipWitness {
    pub secret: Fr,
    pub uuid: Fr,
    pub survey_id: Fr,
    pub leaf: Fr,
    pub nullifier: Fr,
    pub proof: MerkleProof<Fr>,
}

impl MembershipWitness {
    /// Locate the participant's leaf in `tree` and take its path against the
    /// current root.
    pub fn from_tree(
        tree: &MembershipTree,
        secret: Fr,
        uuid: Fr,
        survey_id: Fr,
    ) -> Result<Self, ProveError> {
        let leaf = leaf_commitment(secret, uuid);
        let index = tree.index_of(&leaf).ok_or(ProveError::LeafNotFound)?;
        let proof = tree.get_proof(index)?;

        debug!(index, depth = proof.depth(), "assembled membership witness");

        Ok(Self {
            secret,
            uuid,
            survey_id,
            leaf,
            nullifier: nullifier(secret, uuid, survey_id),
            proof,
        })
    }

    pub fn merkle_index(&self) -> u64 {
        self.proof.leaf_index()
    }

    pub fn merkle_root(&self) -> Fr {
        *self.proof.root()
    }

    pub fn public_inputs(&self) -> MembershipPublicInputs {
        MembershipPublicInputs {
            merkle_root: self.merkle_root(),
            survey_id: self.survey_id,
            nullifier: self.nullifier,
        }
    }

    pub fn to_prover_inputs(&self) -> ProverInputs {
        ProverInputs::new(
            self.secret,
            self.uuid,
            self.survey_id,
            self.nullifier,
            &self.proof,
        )
    }

    pub fn to_circuit(&self) -> MembershipCircuit {
        MembershipCircuit::new(
            self.secret,
            self.uuid,
            self.survey_id,
            self.nullifier,
            self.proof.clone(),
        )
    }
}

/// A proof with its public inputs
#[derive(Clone)]
pub struct ProofWithInputs {
    pub proof: Proof<Bn254>,
    pub public_inputs: Vec<Fr>,
}

impl ProofWithInputs {
    /// Serialize proof to bytes
    pub fn serialize_proof(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        self.proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProveError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize public inputs to bytes (each Fr is 32 bytes)
    pub fn serialize_public_inputs(&self) -> Result<Vec<u8>, ProveError> {
        let mut bytes = Vec::new();
        for input in &self.public_inputs {
            input
                .serialize_compressed(&mut bytes)
                .map_err(|e| ProveError::Serialization(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Deserialize proof from bytes
    pub fn deserialize_proof(bytes: &[u8]) -> Result<Proof<Bn254>, ProveError> {
        Proof::deserialize_compressed(bytes).map_err(|e| ProveError::Serialization(e.to_string()))
    }
}

/// Generate a Groth16 proof for a circuit assignment.
///
/// The circuit's path length must match the depth the key was generated for,
/// its index must name a slot of that tree, and the witness must satisfy the
/// circuit. Nothing is proven otherwise.
pub fn prove_circuit(
    pk: &ProvingKey<Bn254>,
    depth: usize,
    circuit: MembershipCircuit,
) -> Result<ProofWithInputs, ProveError> {
    if circuit.depth() != depth {
        return Err(ProveError::DepthMismatch {
            expected: depth,
            actual: circuit.depth(),
        });
    }

    let index = circuit.proof.leaf_index();
    if index.checked_shr(depth as u32).unwrap_or(0) != 0 {
        return Err(ProveError::IndexOutOfRange { index, depth });
    }

    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit
        .clone()
        .generate_constraints(cs.clone())
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;
    if !cs
        .is_satisfied()
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?
    {
        debug!(depth, "membership witness rejected");
        return Err(ProveError::Unsatisfied);
    }

    let public_inputs = circuit
        .public_inputs()
        .ok_or_else(|| ProveError::ProofGeneration("missing public input".to_string()))?
        .to_vec();

    let start = Instant::now();
    let mut rng = StdRng::from_entropy();
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    info!(depth, elapsed = ?start.elapsed(), "membership proof generated");

    Ok(ProofWithInputs {
        proof,
        public_inputs,
    })
}

/// Generate a proof for a witness taken from the accumulator.
pub fn prove_membership(
    pk: &ProvingKey<Bn254>,
    depth: usize,
    witness: &MembershipWitness,
) -> Result<ProofWithInputs, ProveError> {
    prove_circuit(pk, depth, witness.to_circuit())
}

/// Generate a proof from named string inputs.
pub fn prove_from_inputs(
    pk: &ProvingKey<Bn254>,
    depth: usize,
    inputs: &ProverInputs,
) -> Result<ProofWithInputs, ProveError> {
    prove_circuit(pk, depth, inputs.to_circuit()?)
}
