//! Native Poseidon hashing (outside circuits).

use std::sync::Arc;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;

use super::config::poseidon_config;
use crate::merkle::NodeHasher;

/// Poseidon hasher holding a shared parameter set.
///
/// This is the hash function injected into the Merkle accumulator, and the
/// variadic `hash` used by callers to derive leaves and nullifiers.
#[derive(Clone, Debug)]
pub struct PoseidonHasher {
    config: Arc<PoseidonConfig<Fr>>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self::with_config(Arc::new(poseidon_config()))
    }

    pub fn with_config(config: Arc<PoseidonConfig<Fr>>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<PoseidonConfig<Fr>> {
        &self.config
    }

    /// Absorb all inputs in order and squeeze a single element.
    pub fn hash(&self, inputs: &[Fr]) -> Fr {
        let mut sponge = PoseidonSponge::new(&self.config);
        for input in inputs {
            sponge.absorb(input);
        }
        sponge.squeeze_field_elements::<Fr>(1)[0]
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeHasher for PoseidonHasher {
    type Digest = Fr;

    fn hash_two(&self, left: &Fr, right: &Fr) -> Fr {
        self.hash(&[*left, *right])
    }
}

/// Hash a single field element.
pub fn poseidon_hash(input: Fr) -> Fr {
    PoseidonHasher::new().hash(&[input])
}

/// Hash two field elements.
pub fn poseidon_hash_two(a: Fr, b: Fr) -> Fr {
    PoseidonHasher::new().hash(&[a, b])
}

/// Hash any number of field elements.
pub fn poseidon_hash_many(inputs: &[Fr]) -> Fr {
    PoseidonHasher::new().hash(inputs)
}
