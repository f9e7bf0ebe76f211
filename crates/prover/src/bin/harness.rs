//! End-to-end membership harness.
//!
//! Builds a depth-`--depth` accumulator padded with `hash([0])`, inserts the
//! participant leaf `hash([secret, uuid])`, takes its path, proves membership
//! with a per-survey nullifier and verifies the proof.
//!
//! Usage:
//!   cargo run --release --bin membership-harness
//!   cargo run --release --bin membership-harness -- --survey-id 2 --inputs-out inputs.json

use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};

use membership_circuits::{derive_uuid, leaf_commitment, membership_tree, FieldDigest, MerkleError};
use membership_prover::{
    init_tracing, load_or_setup, parse_field, FieldParseError, Groth16Backend, HarnessConfig,
    MembershipWitness, ProveError, ProvingBackend, SetupError, VerifyError,
};

#[derive(Error, Debug)]
enum HarnessError {
    #[error("invalid {name}: {source}")]
    Input {
        name: &'static str,
        source: FieldParseError,
    },
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Prove(#[from] ProveError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error("failed to write prover inputs: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode prover inputs: {0}")]
    Json(#[from] serde_json::Error),
}

fn field(name: &'static str, value: &str) -> Result<ark_bn254::Fr, HarnessError> {
    parse_field(value).map_err(|source| HarnessError::Input { name, source })
}

fn run(config: &HarnessConfig) -> Result<bool, HarnessError> {
    let mut tree = membership_tree(config.depth)?;

    let secret = field("secret", &config.secret)?;
    let uuid = derive_uuid(field("uuid seed", &config.uuid_seed)?);
    let survey_id = field("survey id", &config.survey_id)?;

    let backend = Groth16Backend::new(load_or_setup(&config.keys_dir, config.depth)?, config.depth);

    let leaf = leaf_commitment(secret, uuid);
    let index = tree.insert(leaf)?;
    info!(index, root = %tree.root().to_field_string(), "inserted participant leaf");

    let witness = MembershipWitness::from_tree(&tree, secret, uuid, survey_id)?;
    let inputs = witness.to_prover_inputs();

    if let Some(path) = &config.inputs_out {
        std::fs::write(path, inputs.to_json()?)?;
        info!(?path, "wrote prover inputs");
    }

    let proof = backend.prove(&inputs)?;
    Ok(backend.verify(&proof)?)
}

fn main() -> ExitCode {
    init_tracing("info");
    let config = HarnessConfig::parse();

    match run(&config) {
        Ok(is_valid) => {
            println!("{{ isValid: {} }}", is_valid);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error in main: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_depth_writes_no_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keys_dir = dir.path().to_str().unwrap();
        let config =
            HarnessConfig::parse_from(["membership-harness", "--depth", "0", "--keys-dir", keys_dir]);

        assert!(matches!(
            run(&config),
            Err(HarnessError::Merkle(MerkleError::InvalidDepth { depth: 0, .. }))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
