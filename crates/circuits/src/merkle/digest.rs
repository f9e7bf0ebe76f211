//! Abstract digest and two-to-one hash used by the accumulator.

use std::fmt::Debug;
use std::hash::Hash;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

/// A hash output the accumulator can store, compare and hand to a prover.
///
/// The accumulator never looks inside a digest; it only needs equality and the
/// canonical string form expected by the proving system.
pub trait FieldDigest: Clone + Eq + Hash + Debug {
    /// Canonical decimal representation of the underlying field element.
    fn to_field_string(&self) -> String;
}

impl FieldDigest for Fr {
    fn to_field_string(&self) -> String {
        BigUint::from_bytes_le(&self.into_bigint().to_bytes_le()).to_string()
    }
}

/// Deterministic two-to-one hash combining a left and right child.
pub trait NodeHasher {
    type Digest: FieldDigest;

    fn hash_two(&self, left: &Self::Digest, right: &Self::Digest) -> Self::Digest;
}

impl<H: NodeHasher + ?Sized> NodeHasher for &H {
    type Digest = H::Digest;

    fn hash_two(&self, left: &Self::Digest, right: &Self::Digest) -> Self::Digest {
        (**self).hash_two(left, right)
    }
}
