//! Trusted setup and key storage for the membership circuit.
//!
//! Keys are specific to a tree depth, so they are stored under a file stem
//! that names the depth: `membership_d10.pk` / `membership_d10.vk`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::info;

use membership_circuits::MembershipCircuit;

/// Seed for reproducible development setups.
pub const SETUP_SEED: u64 = 42;

/// Errors that can occur during setup
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Circuit setup failed: {0}")]
    CircuitSetup(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Proving and verifying key for one circuit shape
#[derive(Clone)]
pub struct CircuitKeyPair {
    pub proving_key: ProvingKey<Bn254>,
    pub verifying_key: VerifyingKey<Bn254>,
}

impl CircuitKeyPair {
    /// Serialize proving key to bytes
    pub fn serialize_pk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize verifying key to bytes
    pub fn serialize_vk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    pub fn deserialize_pk(bytes: &[u8]) -> Result<ProvingKey<Bn254>, SetupError> {
        ProvingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    pub fn deserialize_vk(bytes: &[u8]) -> Result<VerifyingKey<Bn254>, SetupError> {
        VerifyingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    /// Write both keys for `depth` into `dir`, creating it if needed.
    pub fn save_to_directory(&self, dir: &Path, depth: usize) -> Result<(), SetupError> {
        std::fs::create_dir_all(dir)?;

        let (pk_path, vk_path) = key_paths(dir, depth);
        std::fs::write(&pk_path, self.serialize_pk()?)?;
        std::fs::write(&vk_path, self.serialize_vk()?)?;

        info!(?pk_path, ?vk_path, depth, "saved membership keys");
        Ok(())
    }

    /// Read both keys for `depth` from `dir`.
    pub fn load_from_directory(dir: &Path, depth: usize) -> Result<Self, SetupError> {
        let (pk_path, vk_path) = key_paths(dir, depth);

        Ok(Self {
            proving_key: Self::deserialize_pk(&std::fs::read(pk_path)?)?,
            verifying_key: Self::deserialize_vk(&std::fs::read(vk_path)?)?,
        })
    }
}

/// File stem for the keys of a given depth
pub fn key_file_stem(depth: usize) -> String {
    format!("membership_d{}", depth)
}

fn key_paths(dir: &Path, depth: usize) -> (PathBuf, PathBuf) {
    let stem = key_file_stem(depth);
    (
        dir.join(format!("{}.pk", stem)),
        dir.join(format!("{}.vk", stem)),
    )
}

/// Whether keys for `depth` exist in `dir`
pub fn keys_exist(dir: &Path, depth: usize) -> bool {
    let (pk_path, vk_path) = key_paths(dir, depth);
    pk_path.exists() && vk_path.exists()
}

/// Run the Groth16 setup for the membership circuit at `depth`
pub fn setup_membership(rng: &mut StdRng, depth: usize) -> Result<CircuitKeyPair, SetupError> {
    let start = Instant::now();
    let circuit = MembershipCircuit::empty_with_depth(depth);
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        .map_err(|e| SetupError::CircuitSetup(e.to_string()))?;

    info!(depth, elapsed = ?start.elapsed(), "membership circuit setup complete");

    Ok(CircuitKeyPair {
        proving_key: pk,
        verifying_key: vk,
    })
}

/// Load keys for `depth` from `dir`, or run a seeded setup and save them.
pub fn load_or_setup(dir: &Path, depth: usize) -> Result<CircuitKeyPair, SetupError> {
    if keys_exist(dir, depth) {
        info!(?dir, depth, "loading existing membership keys");
        return CircuitKeyPair::load_from_directory(dir, depth);
    }

    info!(?dir, depth, "running trusted setup (development seed)");
    // Fixed seed for reproducible setup; production keys need a real ceremony
    let mut rng = StdRng::seed_from_u64(SETUP_SEED);
    let keys = setup_membership(&mut rng, depth)?;
    keys.save_to_directory(dir, depth)?;
    Ok(keys)
}
