//! Sorted-pair Merkle tree for attestation batches
//!
//! Children are ordered bytewise before hashing, so a path is just the list of
//! sibling digests with no left/right flags. A node with no sibling at its
//! level is promoted unchanged and contributes nothing to the path.

use sha2::{Digest, Sha256};

use crate::error::{PrimitiveError, PrimitiveResult};
use crate::hash::Hash256;

/// Hash two nodes in sorted order: `SHA-256(min(a, b) ‖ max(a, b))`
pub fn hash_pair_sorted(a: &Hash256, b: &Hash256) -> Hash256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo.as_bytes());
    hasher.update(hi.as_bytes());
    Hash256(hasher.finalize().into())
}

/// Fold a leaf hash up through its sibling path
pub fn process_path(leaf: &Hash256, siblings: &[Hash256]) -> Hash256 {
    siblings
        .iter()
        .fold(*leaf, |node, sibling| hash_pair_sorted(&node, sibling))
}

/// Check that a sibling path connects `leaf` to `root`
pub fn verify_path(root: &Hash256, leaf: &Hash256, siblings: &[Hash256]) -> bool {
    process_path(leaf, siblings) == *root
}

/// Merkle tree over pre-computed leaf hashes
#[derive(Debug, Clone)]
pub struct SortedMerkleTree {
    /// Level 0 holds the leaves, the last level holds the root
    levels: Vec<Vec<Hash256>>,
}

impl SortedMerkleTree {
    /// Build a tree from leaf hashes
    pub fn from_leaf_hashes(leaf_hashes: Vec<Hash256>) -> PrimitiveResult<Self> {
        if leaf_hashes.is_empty() {
            return Err(PrimitiveError::EmptyBatch);
        }

        let mut levels = vec![leaf_hashes];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Hash256> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair_sorted(left, right),
                    // odd node out
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }

        Ok(Self { levels })
    }

    /// Get the root hash
    pub fn root(&self) -> Hash256 {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of leaves
    pub fn num_leaves(&self) -> usize {
        self.levels.first().map(Vec::len).unwrap_or(0)
    }

    /// Tree depth (number of levels above the leaves)
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// All leaf hashes
    pub fn leaf_hashes(&self) -> &[Hash256] {
        self.levels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Index of a leaf hash, if present
    pub fn position(&self, leaf: &Hash256) -> Option<usize> {
        self.leaf_hashes().iter().position(|l| l == leaf)
    }

    /// Sibling path for the leaf at `leaf_index`
    pub fn proof(&self, leaf_index: usize) -> PrimitiveResult<Vec<Hash256>> {
        let len = self.num_leaves();
        if leaf_index >= len {
            return Err(PrimitiveError::LeafOutOfBounds {
                index: leaf_index,
                len,
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut index = leaf_index;

        for level in &self.levels[..self.depth()] {
            let sibling_index = index ^ 1;
            if let Some(sibling) = level.get(sibling_index) {
                siblings.push(*sibling);
            }
            index /= 2;
        }

        Ok(siblings)
    }
}
