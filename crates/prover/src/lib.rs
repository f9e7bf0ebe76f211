//! Proof generation library for survey membership.
//!
//! This crate provides utilities for:
//! - Trusted setup (generating, saving and loading keys per tree depth)
//! - Assembling membership witnesses from the Merkle accumulator
//! - Exporting named prover inputs as JSON
//! - Proof generation and local verification behind `ProvingBackend`

pub mod backend;
pub mod config;
pub mod inputs;
pub mod prove;
pub mod setup;
pub mod verify;

pub use backend::{Groth16Backend, ProvingBackend};
pub use config::{init_tracing, HarnessConfig};
pub use inputs::{parse_field, FieldParseError, ProverInputs};
pub use prove::{
    prove_circuit, prove_from_inputs, prove_membership, MembershipWitness, ProofWithInputs,
    ProveError,
};
pub use setup::{load_or_setup, setup_membership, CircuitKeyPair, SetupError, SETUP_SEED};
pub use verify::{verify_membership, VerifyError};

use ark_bn254::Fr;

/// Common field type for all operations
pub type ConstraintF = Fr;
