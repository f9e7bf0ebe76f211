//! Named prover inputs in the string form the circuit ABI expects.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use membership_circuits::{FieldDigest, MembershipCircuit, MerkleProof};

/// Errors parsing field element strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("Empty field element string")]
    Empty,
    #[error("Invalid field element {0:?}: expected decimal or 0x-prefixed hex")]
    Malformed(String),
    #[error("Field element {0} is not below the BN254 scalar modulus")]
    OutOfRange(String),
}

/// Parse a decimal or `0x` hex string into a field element.
///
/// Values at or above the modulus are rejected instead of reduced, so a string
/// always names exactly one element.
pub fn parse_field(value: &str) -> Result<Fr, FieldParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldParseError::Empty);
    }

    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex_digits) => BigUint::from_str_radix(hex_digits, 16),
        None => BigUint::from_str_radix(value, 10),
    }
    .map_err(|_| FieldParseError::Malformed(value.to_string()))?;

    if parsed >= BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le()) {
        return Err(FieldParseError::OutOfRange(value.to_string()));
    }

    Ok(Fr::from_le_bytes_mod_order(&parsed.to_bytes_le()))
}

/// Inputs handed to the proving system, keyed by the circuit's parameter names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverInputs {
    pub secret: String,
    pub uuid: String,
    pub merkle_index: u64,
    pub merkle_proof: Vec<String>,
    pub survey_id: String,
    /// The circuit ABI spells this parameter `nulifier`.
    #[serde(rename = "nulifier")]
    pub nullifier: String,
    pub merkle_root: String,
}

impl ProverInputs {
    pub fn new(
        secret: Fr,
        uuid: Fr,
        survey_id: Fr,
        nullifier: Fr,
        proof: &MerkleProof<Fr>,
    ) -> Self {
        Self {
            secret: secret.to_field_string(),
            uuid: uuid.to_field_string(),
            merkle_index: proof.leaf_index(),
            merkle_proof: proof
                .siblings()
                .iter()
                .map(FieldDigest::to_field_string)
                .collect(),
            survey_id: survey_id.to_field_string(),
            nullifier: nullifier.to_field_string(),
            merkle_root: proof.root().to_field_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rebuild the circuit assignment these inputs describe.
    pub fn to_circuit(&self) -> Result<MembershipCircuit, FieldParseError> {
        let siblings = self
            .merkle_proof
            .iter()
            .map(|s| parse_field(s))
            .collect::<Result<Vec<_>, _>>()?;
        let proof = MerkleProof::new(self.merkle_index, siblings, parse_field(&self.merkle_root)?);

        Ok(MembershipCircuit::new(
            parse_field(&self.secret)?,
            parse_field(&self.uuid)?,
            parse_field(&self.survey_id)?,
            parse_field(&self.nullifier)?,
            proof,
        ))
    }
}
