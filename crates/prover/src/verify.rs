//! Local proof verification for the membership circuit.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use thiserror::Error;
use tracing::info;

use membership_circuits::MembershipPublicInputs;

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification failed: {0}")]
    Verification(String),
    #[error("Invalid public inputs: expected 3, got {0}")]
    InvalidInputs(usize),
}

/// Verify a membership proof against `[merkle_root, survey_id, nullifier]`.
pub fn verify_membership(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_inputs: &[Fr],
) -> Result<bool, VerifyError> {
    let public = MembershipPublicInputs::from_slice(public_inputs)
        .ok_or(VerifyError::InvalidInputs(public_inputs.len()))?;

    let valid = Groth16::<Bn254>::verify(vk, &public.to_vec(), proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))?;

    info!(valid, "membership proof verified");
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prove::{prove_membership, MembershipWitness};
    use crate::setup::setup_membership;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use membership_circuits::{derive_uuid, leaf_commitment, membership_tree, nullifier};

    const DEPTH: usize = 4;

    #[test]
    fn test_verify_membership() {
        let mut rng = StdRng::seed_from_u64(42);
        let keys = setup_membership(&mut rng, DEPTH).unwrap();

        let secret = Fr::from(1u64);
        let uuid = derive_uuid(Fr::from(0xddddddu64));
        let survey_id = Fr::from(1u64);

        let mut tree = membership_tree(DEPTH).unwrap();
        tree.insert(leaf_commitment(Fr::from(5u64), uuid)).unwrap();
        tree.insert(leaf_commitment(secret, uuid)).unwrap();

        let witness = MembershipWitness::from_tree(&tree, secret, uuid, survey_id).unwrap();
        let result = prove_membership(&keys.proving_key, DEPTH, &witness).unwrap();

        let valid =
            verify_membership(&keys.verifying_key, &result.proof, &result.public_inputs).unwrap();
        assert!(valid);

        // Wrong nullifier should fail
        let mut wrong = result.public_inputs.clone();
        wrong[2] = nullifier(secret, uuid, Fr::from(2u64));
        let invalid = verify_membership(&keys.verifying_key, &result.proof, &wrong).unwrap();
        assert!(!invalid);
    }

    #[test]
    fn test_rejects_wrong_input_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let keys = setup_membership(&mut rng, DEPTH).unwrap();

        let secret = Fr::from(2u64);
        let uuid = derive_uuid(Fr::from(2u64));
        let mut tree = membership_tree(DEPTH).unwrap();
        tree.insert(leaf_commitment(secret, uuid)).unwrap();

        let witness = MembershipWitness::from_tree(&tree, secret, uuid, Fr::from(1u64)).unwrap();
        let result = prove_membership(&keys.proving_key, DEPTH, &witness).unwrap();

        assert!(matches!(
            verify_membership(&keys.verifying_key, &result.proof, &result.public_inputs[..2]),
            Err(VerifyError::InvalidInputs(2))
        ));
    }
}
