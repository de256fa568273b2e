//! Incremental commitment tree with a bounded root history.
//!
//! Leaves are only ever appended in pairs (every accepted transaction
//! produces exactly two output commitments), so the tree keeps just the
//! frontier of filled subtrees plus the zero-subtree constants. Each
//! insertion writes the new root into a 100-slot ring buffer; a proof may
//! anchor to any root still inside the window, which keeps it valid across
//! insertions that land between proving and submission.

use ark_ff::{PrimeField, Zero};
use once_cell::sync::Lazy;
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::poseidon::hash2;
use crate::Field;

/// Number of recent roots that remain valid proof anchors.
pub const ROOT_HISTORY_SIZE: usize = 100;

/// Tallest supported tree; leaf indices must fit in a u32.
pub const MAX_HEIGHT: u32 = 31;

/// Empty-leaf marker: keccak256("shroud") reduced into the field, distinct
/// from any commitment a wallet would produce.
pub static ZERO_LEAF: Lazy<Field> = Lazy::new(|| {
    let hash = Keccak256::digest(b"shroud");
    Field::from_be_bytes_mod_order(&hash)
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Tree height {0} outside supported range 1..=31")]
    InvalidHeight(u32),

    #[error("Tree is full: {0} leaves at height {1}")]
    TreeFull(u32, u32),

    #[error("Inconsistent tree state: {0}")]
    InconsistentState(String),
}

/// Append-only Merkle tree over note commitments.
#[derive(Clone, Debug)]
pub struct CommitmentTree {
    height: u32,
    next_leaf_index: u32,
    /// Rightmost filled subtree root at each level
    filled_subtrees: Vec<Field>,
    /// Zero-subtree root at each level; zeros[height] is the empty root
    zeros: Vec<Field>,
    /// Ring buffer of recent roots; zero marks a never-written slot
    roots: [Field; ROOT_HISTORY_SIZE],
    root_cursor: usize,
}

impl CommitmentTree {
    /// Create an empty tree of the given height (1..=31).
    pub fn new(height: u32) -> Result<Self, MerkleError> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(MerkleError::InvalidHeight(height));
        }

        let zeros = compute_zeros(height);
        let mut roots = [Field::zero(); ROOT_HISTORY_SIZE];
        roots[0] = zeros[height as usize];

        Ok(Self {
            height,
            next_leaf_index: 0,
            filled_subtrees: zeros[..height as usize].to_vec(),
            zeros,
            roots,
            root_cursor: 0,
        })
    }

    /// Rebuild a tree from persisted parts. Zero-subtree constants are
    /// recomputed from the height; everything else is validated and taken
    /// as supplied.
    pub fn from_saved(
        height: u32,
        filled_subtrees: Vec<Field>,
        roots: [Field; ROOT_HISTORY_SIZE],
        root_cursor: usize,
        next_leaf_index: u32,
    ) -> Result<Self, MerkleError> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(MerkleError::InvalidHeight(height));
        }
        if filled_subtrees.len() != height as usize {
            return Err(MerkleError::InconsistentState(format!(
                "{} filled subtrees for height {}",
                filled_subtrees.len(),
                height
            )));
        }
        if root_cursor >= ROOT_HISTORY_SIZE {
            return Err(MerkleError::InconsistentState(format!(
                "root cursor {root_cursor} out of range"
            )));
        }
        if next_leaf_index % 2 != 0 || next_leaf_index > 1u32 << height {
            return Err(MerkleError::InconsistentState(format!(
                "bad next leaf index {next_leaf_index}"
            )));
        }

        Ok(Self {
            height,
            next_leaf_index,
            filled_subtrees,
            zeros: compute_zeros(height),
            roots,
            root_cursor,
        })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Index the next inserted pair will occupy; always even.
    pub fn next_leaf_index(&self) -> u32 {
        self.next_leaf_index
    }

    /// Total number of leaf slots.
    pub fn capacity(&self) -> u32 {
        1u32 << self.height
    }

    pub fn is_full(&self) -> bool {
        self.next_leaf_index == self.capacity()
    }

    /// Root written by the most recent insertion (the empty root before any).
    pub fn current_root(&self) -> Field {
        self.roots[self.root_cursor]
    }

    /// Append two commitments as adjacent leaves, returning the index of the
    /// first. The pair hash seeds the walk at level 1; an even subtree index
    /// extends the frontier and pads with the zero subtree on the right, an
    /// odd one closes the stored sibling on the left.
    pub fn insert_pair(&mut self, left: Field, right: Field) -> Result<u32, MerkleError> {
        if self.is_full() {
            return Err(MerkleError::TreeFull(self.next_leaf_index, self.height));
        }

        let base_index = self.next_leaf_index;
        let mut current_index = base_index >> 1;
        let mut current_hash = hash2(left, right);

        for level in 1..self.height as usize {
            if current_index % 2 == 0 {
                self.filled_subtrees[level] = current_hash;
                current_hash = hash2(current_hash, self.zeros[level]);
            } else {
                current_hash = hash2(self.filled_subtrees[level], current_hash);
            }
            current_index >>= 1;
        }

        self.root_cursor = (self.root_cursor + 1) % ROOT_HISTORY_SIZE;
        self.roots[self.root_cursor] = current_hash;
        self.next_leaf_index += 2;

        Ok(base_index)
    }

    /// Whether a root is still inside the history window. Zero is the
    /// unwritten-slot sentinel and is never a valid anchor.
    pub fn is_known_root(&self, root: Field) -> bool {
        if root.is_zero() {
            return false;
        }

        let start = self.root_cursor;
        let mut i = start;
        loop {
            if self.roots[i] == root {
                return true;
            }
            i = if i == 0 { ROOT_HISTORY_SIZE - 1 } else { i - 1 };
            if i == start {
                return false;
            }
        }
    }

    pub fn filled_subtrees(&self) -> &[Field] {
        &self.filled_subtrees
    }

    pub fn root_history(&self) -> &[Field; ROOT_HISTORY_SIZE] {
        &self.roots
    }

    pub fn root_cursor(&self) -> usize {
        self.root_cursor
    }
}

/// Zero-subtree roots: zeros[0] is the empty leaf, zeros[i] the root of an
/// empty subtree of height i.
fn compute_zeros(height: u32) -> Vec<Field> {
    let mut zeros = vec![*ZERO_LEAF];
    for i in 0..height as usize {
        zeros.push(hash2(zeros[i], zeros[i]));
    }
    zeros
}
