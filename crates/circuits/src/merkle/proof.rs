//! Inclusion proof for an accumulator leaf.

use super::digest::{FieldDigest, NodeHasher};
use super::tree::MAX_DEPTH;

/// Sibling path from a leaf to the root it was generated against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof<D> {
    leaf_index: u64,

    /// Sibling hashes from leaf level (0) to the level below the root
    siblings: Vec<D>,

    root: D,
}

impl<D: FieldDigest> MerkleProof<D> {
    pub fn new(leaf_index: u64, siblings: Vec<D>, root: D) -> Self {
        Self {
            leaf_index,
            siblings,
            root,
        }
    }

    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }

    pub fn siblings(&self) -> &[D] {
        &self.siblings
    }

    /// Root of the tree at the time the proof was generated.
    pub fn root(&self) -> &D {
        &self.root
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Direction at each level, bottom to top: true = path node is the right child.
    pub fn path_indices(&self) -> Vec<bool> {
        (0..self.depth())
            .map(|level| index_bit(self.leaf_index, level))
            .collect()
    }

    /// Recompute the root from `leaf` along this path.
    pub fn compute_root<H>(&self, hasher: &H, leaf: &D) -> D
    where
        H: NodeHasher<Digest = D>,
    {
        compute_root(hasher, leaf, self.leaf_index, &self.siblings)
    }

    /// Check that `leaf` sits at `leaf_index` under `root`.
    pub fn verify<H>(&self, hasher: &H, leaf: &D) -> bool
    where
        H: NodeHasher<Digest = D>,
    {
        verify_path(hasher, leaf, self.leaf_index, &self.siblings, &self.root)
    }

    pub fn into_parts(self) -> (u64, Vec<D>, D) {
        (self.leaf_index, self.siblings, self.root)
    }
}

/// Bit `level` of `index`; zero past the width of `u64`.
fn index_bit(index: u64, level: usize) -> bool {
    u32::try_from(level)
        .ok()
        .and_then(|shift| index.checked_shr(shift))
        .map_or(false, |shifted| shifted & 1 == 1)
}

/// Fold a leaf up a sibling path, pairing by the bits of `index`.
pub fn compute_root<H: NodeHasher>(
    hasher: &H,
    leaf: &H::Digest,
    index: u64,
    siblings: &[H::Digest],
) -> H::Digest {
    let mut current = leaf.clone();

    for (level, sibling) in siblings.iter().enumerate() {
        current = if index_bit(index, level) {
            hasher.hash_two(sibling, &current)
        } else {
            hasher.hash_two(&current, sibling)
        };
    }

    current
}

/// Verification side of the accumulator: true iff `leaf` at `index` with these
/// siblings hashes up to `root`.
///
/// An index with bits above the path length cannot name a slot in the tree and
/// is rejected, as is any path longer than `MAX_DEPTH`.
pub fn verify_path<H: NodeHasher>(
    hasher: &H,
    leaf: &H::Digest,
    index: u64,
    siblings: &[H::Digest],
    root: &H::Digest,
) -> bool {
    if siblings.len() > MAX_DEPTH || index >> siblings.len() != 0 {
        return false;
    }

    compute_root(hasher, leaf, index, siblings) == *root
}

#[cfg(test)]
mod proof_tests {
    use super::*;
    use crate::poseidon::{poseidon_hash_two, PoseidonHasher};
    use ark_bn254::Fr;

    #[test]
    fn test_proof_accessors() {
        let siblings = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
        let proof = MerkleProof::new(5, siblings.clone(), Fr::from(9u64));

        assert_eq!(proof.depth(), 3);
        assert_eq!(proof.siblings(), &siblings[..]);
        assert_eq!(proof.path_indices(), vec![true, false, true]);
        assert_eq!(proof.leaf_index(), 5);
    }

    #[test]
    fn test_compute_root_follows_index_bits() {
        let hasher = PoseidonHasher::new();
        let leaf = Fr::from(10u64);
        let s0 = Fr::from(20u64);
        let s1 = Fr::from(30u64);

        // index 1: right child at level 0, left child at level 1
        let expected = poseidon_hash_two(poseidon_hash_two(s0, leaf), s1);
        assert_eq!(compute_root(&hasher, &leaf, 1, &[s0, s1]), expected);
    }

    #[test]
    fn test_verify_rejects_index_beyond_path() {
        let hasher = PoseidonHasher::new();
        let leaf = Fr::from(10u64);
        let siblings = [Fr::from(20u64), Fr::from(30u64)];
        let root = compute_root(&hasher, &leaf, 1, &siblings);

        assert!(verify_path(&hasher, &leaf, 1, &siblings, &root));
        // 5 = 0b101 folds like 1 but names a slot outside a depth-2 tree
        assert!(!verify_path(&hasher, &leaf, 5, &siblings, &root));
    }

    #[test]
    fn test_paths_longer_than_u64() {
        let hasher = PoseidonHasher::new();
        let leaf = Fr::from(10u64);
        let siblings = vec![Fr::from(7u64); 65];

        // bits past 63 read as zero, so the top levels pair leaf-side left
        let index = u64::MAX;
        let below = compute_root(&hasher, &leaf, index, &siblings[..64]);
        let root = compute_root(&hasher, &leaf, index, &siblings);
        assert_eq!(root, poseidon_hash_two(below, siblings[64]));

        let proof = MerkleProof::new(index, siblings.clone(), root);
        assert!(!proof.path_indices()[64]);

        assert!(!verify_path(&hasher, &leaf, index, &siblings, &root));
        assert!(!verify_path(&hasher, &leaf, 0, &siblings, &root));
    }
}
