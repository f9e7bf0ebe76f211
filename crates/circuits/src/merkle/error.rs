use thiserror::Error;

/// Errors raised by the Merkle accumulator.
///
/// A missing leaf is not an error: `index_of` returns `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Invalid tree depth {depth}: must be between 1 and {max}")]
    InvalidDepth { depth: usize, max: usize },
    #[error("Tree is full: capacity of {capacity} leaves reached")]
    CapacityExceeded { capacity: u64 },
    #[error("Leaf index {index} out of range: tree holds {len} leaves")]
    IndexOutOfRange { index: u64, len: u64 },
}
