//! Proving backend seam.
//!
//! The harness talks to the proof system only through named string inputs,
//! the same shape an external circuit runtime would accept.

use ark_bn254::Bn254;
use ark_groth16::VerifyingKey;

use crate::inputs::ProverInputs;
use crate::prove::{prove_from_inputs, ProofWithInputs, ProveError};
use crate::setup::CircuitKeyPair;
use crate::verify::{verify_membership, VerifyError};

/// Proof system that consumes prover inputs and checks its own proofs.
pub trait ProvingBackend: Send + Sync {
    /// Tree depth the backend's circuit was compiled for.
    fn depth(&self) -> usize;

    fn prove(&self, inputs: &ProverInputs) -> Result<ProofWithInputs, ProveError>;

    fn verify(&self, proof: &ProofWithInputs) -> Result<bool, VerifyError>;
}

/// In-process Groth16 over BN254.
#[derive(Clone)]
pub struct Groth16Backend {
    keys: CircuitKeyPair,
    depth: usize,
}

impl Groth16Backend {
    pub fn new(keys: CircuitKeyPair, depth: usize) -> Self {
        Self { keys, depth }
    }

    pub fn keys(&self) -> &CircuitKeyPair {
        &self.keys
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.keys.verifying_key
    }
}

impl ProvingBackend for Groth16Backend {
    fn depth(&self) -> usize {
        self.depth
    }

    fn prove(&self, inputs: &ProverInputs) -> Result<ProofWithInputs, ProveError> {
        prove_from_inputs(&self.keys.proving_key, self.depth, inputs)
    }

    fn verify(&self, proof: &ProofWithInputs) -> Result<bool, VerifyError> {
        verify_membership(&self.keys.verifying_key, &proof.proof, &proof.public_inputs)
    }
}
