//! Leaf commitments and nullifiers for survey participation.
//!
//! A participant holds a `secret` and a `uuid`. The accumulator stores
//! `hash([secret, uuid])`; casting a response for a survey reveals
//! `hash([secret, uuid, survey_id])`, which is unique per survey and does not
//! link back to the leaf.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::poseidon::{poseidon_hash, poseidon_hash_many, poseidon_hash_many_var};

/// Padding value for unused accumulator slots: `hash([0])`.
pub fn zero_leaf() -> Fr {
    poseidon_hash(Fr::zero())
}

/// Participant identifier derived from a raw id: `hash([raw])`.
pub fn derive_uuid(raw: Fr) -> Fr {
    poseidon_hash(raw)
}

/// Leaf commitment `hash([secret, uuid])`.
pub fn leaf_commitment(secret: Fr, uuid: Fr) -> Fr {
    poseidon_hash_many(&[secret, uuid])
}

/// Per-survey nullifier `hash([secret, uuid, survey_id])`.
pub fn nullifier(secret: Fr, uuid: Fr, survey_id: Fr) -> Fr {
    poseidon_hash_many(&[secret, uuid, survey_id])
}

/// In-circuit leaf commitment.
pub fn leaf_commitment_var(
    cs: ConstraintSystemRef<Fr>,
    secret: &FpVar<Fr>,
    uuid: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    poseidon_hash_many_var(cs, &[secret.clone(), uuid.clone()])
}

/// In-circuit nullifier.
pub fn nullifier_var(
    cs: ConstraintSystemRef<Fr>,
    secret: &FpVar<Fr>,
    uuid: &FpVar<Fr>,
    survey_id: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    poseidon_hash_many_var(cs, &[secret.clone(), uuid.clone(), survey_id.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_r1cs_std::alloc::AllocVar;
    use ark_r1cs_std::R1CSVar;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn test_nullifier_differs_per_survey() {
        let secret = Fr::from(1u64);
        let uuid = derive_uuid(Fr::from(0xddddddu64));

        let n1 = nullifier(secret, uuid, Fr::from(1u64));
        let n2 = nullifier(secret, uuid, Fr::from(2u64));

        assert_ne!(n1, n2);
        assert_ne!(n1, leaf_commitment(secret, uuid));
    }

    #[test]
    fn test_leaf_depends_on_secret() {
        let uuid = derive_uuid(Fr::from(7u64));
        assert_ne!(
            leaf_commitment(Fr::from(1u64), uuid),
            leaf_commitment(Fr::from(2u64), uuid)
        );
    }

    #[test]
    fn test_gadgets_match_native() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let secret = Fr::from(5u64);
        let uuid = derive_uuid(Fr::from(9u64));
        let survey_id = Fr::from(3u64);

        let secret_var = FpVar::new_witness(cs.clone(), || Ok(secret)).unwrap();
        let uuid_var = FpVar::new_witness(cs.clone(), || Ok(uuid)).unwrap();
        let survey_var = FpVar::new_witness(cs.clone(), || Ok(survey_id)).unwrap();

        let leaf_var = leaf_commitment_var(cs.clone(), &secret_var, &uuid_var).unwrap();
        let spent_var = nullifier_var(cs.clone(), &secret_var, &uuid_var, &survey_var).unwrap();

        assert_eq!(leaf_var.value().unwrap(), leaf_commitment(secret, uuid));
        assert_eq!(spent_var.value().unwrap(), nullifier(secret, uuid, survey_id));
        assert!(cs.is_satisfied().unwrap());
    }
}
