//! Append-only incremental Merkle tree.
//!
//! Leaves are appended left to right and never removed. Every slot that has
//! not been filled holds the zero value, so the tree always commits to exactly
//! `2^depth` leaves.
//!
//! Nodes live in one vector per level. Since leaves only ever grow from the
//! left, the populated nodes of a level always form a prefix: level `l` stores
//! `ceil(len / 2^l)` nodes and everything past that reads as the level's zero
//! hash. An insertion touches one node per level.

use std::fmt;

use super::digest::NodeHasher;
use super::error::MerkleError;
use super::proof::MerkleProof;

/// Depth used by the survey harness (1,024 leaves).
pub const DEFAULT_DEPTH: usize = 10;

/// Largest supported depth; leaf indices are `u64`.
pub const MAX_DEPTH: usize = 32;

/// Children per internal node.
pub const ARITY: usize = 2;

/// Whether the accumulator still accepts insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccumulatorState {
    Open,
    /// Terminal: every slot is filled.
    Full,
}

/// Fixed-depth binary Merkle accumulator.
#[derive(Clone)]
pub struct IncrementalMerkleTree<H: NodeHasher> {
    depth: usize,
    hasher: H,

    /// levels[0] = leaves, levels[depth] = root once anything is inserted
    levels: Vec<Vec<H::Digest>>,

    /// zeros[0] = zero value
    /// zeros[l] = hash(zeros[l-1], zeros[l-1])
    zeros: Vec<H::Digest>,
}

impl<H: NodeHasher> IncrementalMerkleTree<H> {
    /// Create an empty tree. The root of the empty tree is the zero value
    /// hashed with itself `depth` times.
    pub fn new(depth: usize, hasher: H, zero_value: H::Digest) -> Result<Self, MerkleError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(MerkleError::InvalidDepth {
                depth,
                max: MAX_DEPTH,
            });
        }

        let zeros = Self::compute_zeros(&hasher, zero_value, depth);

        Ok(Self {
            depth,
            hasher,
            levels: vec![Vec::new(); depth + 1],
            zeros,
        })
    }

    /// Rebuild a tree from a snapshot of its leaves, in insertion order.
    pub fn from_leaves<I>(
        depth: usize,
        hasher: H,
        zero_value: H::Digest,
        leaves: I,
    ) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = H::Digest>,
    {
        let mut tree = Self::new(depth, hasher, zero_value)?;
        for leaf in leaves {
            tree.insert(leaf)?;
        }
        Ok(tree)
    }

    fn compute_zeros(hasher: &H, zero_value: H::Digest, depth: usize) -> Vec<H::Digest> {
        let mut zeros = Vec::with_capacity(depth + 1);
        zeros.push(zero_value);

        for level in 0..depth {
            let parent = hasher.hash_two(&zeros[level], &zeros[level]);
            zeros.push(parent);
        }

        zeros
    }

    /// Append a leaf and return its index.
    ///
    /// Only the ancestors of the new slot are rehashed.
    pub fn insert(&mut self, leaf: H::Digest) -> Result<u64, MerkleError> {
        let index = self.len();
        if index >= self.capacity() {
            return Err(MerkleError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }

        self.levels[0].push(leaf);

        let mut position = index as usize;
        for level in 0..self.depth {
            let parent = if position & 1 == 0 {
                self.hasher
                    .hash_two(self.node(level, position), self.node(level, position + 1))
            } else {
                self.hasher
                    .hash_two(self.node(level, position - 1), self.node(level, position))
            };

            position >>= 1;
            self.set_node(level + 1, position, parent);
        }

        Ok(index)
    }

    /// Index of the first leaf equal to `leaf`, in insertion order.
    pub fn index_of(&self, leaf: &H::Digest) -> Option<u64> {
        self.levels[0]
            .iter()
            .position(|candidate| candidate == leaf)
            .map(|index| index as u64)
    }

    /// Authentication path for an inserted leaf, against the current root.
    pub fn get_proof(&self, index: u64) -> Result<MerkleProof<H::Digest>, MerkleError> {
        if index >= self.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth);
        let mut position = index as usize;
        for level in 0..self.depth {
            siblings.push(self.node(level, position ^ 1).clone());
            position >>= 1;
        }

        Ok(MerkleProof::new(index, siblings, self.root()))
    }

    /// Proofs for several leaves against the same tree state.
    ///
    /// With the `parallel` feature the paths are collected on the rayon pool;
    /// the tree is only read, so no locking is involved.
    #[cfg(feature = "parallel")]
    pub fn get_proofs(&self, indices: &[u64]) -> Result<Vec<MerkleProof<H::Digest>>, MerkleError>
    where
        H: Sync,
        H::Digest: Send + Sync,
    {
        use rayon::prelude::*;

        indices
            .par_iter()
            .map(|&index| self.get_proof(index))
            .collect()
    }

    /// Proofs for several leaves against the same tree state.
    #[cfg(not(feature = "parallel"))]
    pub fn get_proofs(&self, indices: &[u64]) -> Result<Vec<MerkleProof<H::Digest>>, MerkleError> {
        indices.iter().map(|&index| self.get_proof(index)).collect()
    }

    fn node(&self, level: usize, position: usize) -> &H::Digest {
        self.levels[level]
            .get(position)
            .unwrap_or(&self.zeros[level])
    }

    fn set_node(&mut self, level: usize, position: usize, value: H::Digest) {
        let nodes = &mut self.levels[level];
        if position < nodes.len() {
            nodes[position] = value;
        } else {
            debug_assert_eq!(position, nodes.len(), "levels must stay dense");
            nodes.push(value);
        }
    }

    /// Current root.
    pub fn root(&self) -> H::Digest {
        self.node(self.depth, 0).clone()
    }

    /// Number of inserted leaves.
    pub fn len(&self) -> u64 {
        self.levels[0].len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Number of leaf slots, `2^depth`.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn state(&self) -> AccumulatorState {
        if self.len() == self.capacity() {
            AccumulatorState::Full
        } else {
            AccumulatorState::Open
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn arity(&self) -> usize {
        ARITY
    }

    /// Inserted leaves in insertion order.
    pub fn leaves(&self) -> &[H::Digest] {
        &self.levels[0]
    }

    /// The padding value of unused leaf slots.
    pub fn zero_value(&self) -> &H::Digest {
        &self.zeros[0]
    }

    /// Root of an empty subtree of the given height.
    pub fn zero_at_level(&self, level: usize) -> Option<&H::Digest> {
        self.zeros.get(level)
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<H: NodeHasher> fmt::Debug for IncrementalMerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalMerkleTree")
            .field("depth", &self.depth)
            .field("len", &self.len())
            .field("root", &self.root())
            .finish()
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;
    use crate::merkle::digest::FieldDigest;

    /// Non-commutative toy hash so tests can reason about exact node values.
    #[derive(Clone, Debug, Default)]
    struct PairHasher;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Node(String);

    impl FieldDigest for Node {
        fn to_field_string(&self) -> String {
            self.0.clone()
        }
    }

    impl NodeHasher for PairHasher {
        type Digest = Node;

        fn hash_two(&self, left: &Node, right: &Node) -> Node {
            Node(format!("({},{})", left.0, right.0))
        }
    }

    fn leaf(name: &str) -> Node {
        Node(name.to_string())
    }

    fn tree(depth: usize) -> IncrementalMerkleTree<PairHasher> {
        IncrementalMerkleTree::new(depth, PairHasher, leaf("z")).unwrap()
    }

    #[test]
    fn test_rejects_invalid_depth() {
        assert_eq!(
            IncrementalMerkleTree::new(0, PairHasher, leaf("z")).unwrap_err(),
            MerkleError::InvalidDepth { depth: 0, max: MAX_DEPTH }
        );
        assert!(IncrementalMerkleTree::new(MAX_DEPTH + 1, PairHasher, leaf("z")).is_err());
        assert!(IncrementalMerkleTree::new(MAX_DEPTH, PairHasher, leaf("z")).is_ok());
    }

    #[test]
    fn test_empty_root_is_folded_zero() {
        let tree = tree(3);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), leaf("(((z,z),(z,z)),((z,z),(z,z)))"));
        assert_eq!(tree.zero_at_level(1), Some(&leaf("(z,z)")));
        assert_eq!(tree.zero_at_level(4), None);
    }

    #[test]
    fn test_insert_assigns_sequential_indices() {
        let mut tree = tree(3);
        assert_eq!(tree.insert(leaf("a")).unwrap(), 0);
        assert_eq!(tree.insert(leaf("b")).unwrap(), 1);
        assert_eq!(tree.insert(leaf("c")).unwrap(), 2);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.leaves(), &[leaf("a"), leaf("b"), leaf("c")]);
    }

    #[test]
    fn test_root_tracks_padding() {
        let mut tree = tree(2);
        tree.insert(leaf("a")).unwrap();
        assert_eq!(tree.root(), leaf("((a,z),(z,z))"));

        tree.insert(leaf("b")).unwrap();
        tree.insert(leaf("c")).unwrap();
        assert_eq!(tree.root(), leaf("((a,b),(c,z))"));
    }

    #[test]
    fn test_proof_siblings_bottom_to_top() {
        let mut tree = tree(2);
        for name in ["a", "b", "c"] {
            tree.insert(leaf(name)).unwrap();
        }

        let proof = tree.get_proof(2).unwrap();
        assert_eq!(proof.siblings(), &[leaf("z"), leaf("(a,b)")]);
        assert_eq!(proof.path_indices(), vec![false, true]);
        assert_eq!(proof.root(), &tree.root());
        assert!(proof.verify(tree.hasher(), &leaf("c")));
    }

    #[test]
    fn test_capacity_and_state() {
        let mut tree = tree(1);
        assert_eq!(tree.capacity(), 2);
        assert_eq!(tree.state(), AccumulatorState::Open);

        tree.insert(leaf("a")).unwrap();
        tree.insert(leaf("b")).unwrap();
        assert_eq!(tree.state(), AccumulatorState::Full);

        assert_eq!(
            tree.insert(leaf("c")).unwrap_err(),
            MerkleError::CapacityExceeded { capacity: 2 }
        );
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root(), leaf("(a,b)"));
    }

    #[test]
    fn test_from_leaves_matches_incremental() {
        let mut incremental = tree(3);
        for name in ["a", "b", "c", "d", "e"] {
            incremental.insert(leaf(name)).unwrap();
        }

        let rebuilt = IncrementalMerkleTree::from_leaves(
            3,
            PairHasher,
            leaf("z"),
            incremental.leaves().to_vec(),
        )
        .unwrap();

        assert_eq!(rebuilt.root(), incremental.root());
    }

    #[test]
    fn test_from_leaves_over_capacity() {
        let leaves = vec![leaf("a"), leaf("b"), leaf("c")];
        assert_eq!(
            IncrementalMerkleTree::from_leaves(1, PairHasher, leaf("z"), leaves).unwrap_err(),
            MerkleError::CapacityExceeded { capacity: 2 }
        );
    }

    #[test]
    fn test_get_proofs_matches_single() {
        let mut tree = tree(3);
        for name in ["a", "b", "c", "d"] {
            tree.insert(leaf(name)).unwrap();
        }

        let proofs = tree.get_proofs(&[3, 0, 2]).unwrap();
        assert_eq!(proofs[0], tree.get_proof(3).unwrap());
        assert_eq!(proofs[1], tree.get_proof(0).unwrap());
        assert_eq!(proofs[2], tree.get_proof(2).unwrap());

        assert!(tree.get_proofs(&[1, 4]).is_err());
    }
}
