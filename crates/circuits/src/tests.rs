//! Groth16 end-to-end tests for the membership circuit.

use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};

use crate::commitment::{derive_uuid, leaf_commitment, nullifier};
use crate::membership::{membership_tree, MembershipCircuit};

const TEST_DEPTH: usize = 4;

#[test]
fn test_membership_full_proof() {
    let mut rng = StdRng::seed_from_u64(7);

    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(
        MembershipCircuit::empty_with_depth(TEST_DEPTH),
        &mut rng,
    )
    .unwrap();

    let secret = Fr::from(1u64);
    let uuid = derive_uuid(Fr::from(0xddddddu64));
    let survey_id = Fr::from(1u64);

    let mut tree = membership_tree(TEST_DEPTH).unwrap();
    let index = tree.insert(leaf_commitment(secret, uuid)).unwrap();
    let proof = tree.get_proof(index).unwrap();

    let circuit = MembershipCircuit::new(
        secret,
        uuid,
        survey_id,
        nullifier(secret, uuid, survey_id),
        proof,
    );
    let public_inputs = circuit.public_inputs().unwrap().to_vec();

    let groth_proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng).unwrap();
    assert!(Groth16::<Bn254>::verify(&vk, &public_inputs, &groth_proof).unwrap());

    // Same proof replayed against another survey must not verify
    let mut replayed = public_inputs.clone();
    replayed[1] = Fr::from(2u64);
    assert!(!Groth16::<Bn254>::verify(&vk, &replayed, &groth_proof).unwrap());
}

#[test]
fn test_proof_against_later_root() {
    let mut rng = StdRng::seed_from_u64(11);

    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(
        MembershipCircuit::empty_with_depth(TEST_DEPTH),
        &mut rng,
    )
    .unwrap();

    let secret = Fr::from(3u64);
    let uuid = derive_uuid(Fr::from(3u64));
    let survey_id = Fr::from(5u64);

    let mut tree = membership_tree(TEST_DEPTH).unwrap();
    let index = tree.insert(leaf_commitment(secret, uuid)).unwrap();
    let old_root = tree.root();

    for raw in 10u64..13 {
        tree.insert(leaf_commitment(Fr::from(raw), derive_uuid(Fr::from(raw))))
            .unwrap();
    }

    // A witness taken after more inserts proves against the new root only
    let proof = tree.get_proof(index).unwrap();
    let circuit = MembershipCircuit::new(
        secret,
        uuid,
        survey_id,
        nullifier(secret, uuid, survey_id),
        proof,
    );
    let mut public_inputs = circuit.public_inputs().unwrap().to_vec();
    let groth_proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng).unwrap();

    assert!(Groth16::<Bn254>::verify(&vk, &public_inputs, &groth_proof).unwrap());

    public_inputs[0] = old_root;
    assert!(!Groth16::<Bn254>::verify(&vk, &public_inputs, &groth_proof).unwrap());
}
