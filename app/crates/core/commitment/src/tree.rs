//! Bottom-up binary tree over ballot fingerprints.

use crate::{empty_root, parent};

/// Binary SHA-256 tree over the fingerprints of one submitted batch.
///
/// Level 0 is the leaf sequence in batch-input order. Nodes pair in index
/// order; a level of odd length pairs its last node with itself, at every
/// level independently. Every intermediate level is retained so proofs can
/// be read off without rehashing.
#[derive(Debug)]
pub struct BallotTree {
    levels: Vec<Vec<String>>,
}

impl BallotTree {
    /// Build the tree from leaf fingerprints in batch order.
    pub fn build(leaves: Vec<String>) -> Self {
        let mut levels = Vec::new();
        let mut current = leaves;
        while current.len() > 1 {
            let next: Vec<String> = current
                .chunks(2)
                .map(|pair| parent(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            levels.push(current);
            current = next;
        }
        levels.push(current);
        Self { levels }
    }

    /// Number of leaves the tree commits to.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// The committed root; `sha256("")` for an empty batch.
    pub fn root(&self) -> String {
        self.levels
            .last()
            .and_then(|level| level.first())
            .cloned()
            .unwrap_or_else(empty_root)
    }

    /// Sibling path for the leaf at `index`, from the leaf to just below the
    /// root, without side flags.
    ///
    /// At an odd-length level the last node is its own sibling. A single-leaf
    /// batch yields an empty path. Indices come from enumerating the batch,
    /// so they are always in range; an out-of-range index yields an empty
    /// path rather than a panic.
    pub fn proof(&self, index: usize) -> Vec<String> {
        let mut path = Vec::new();
        let mut position = index;
        for level in &self.levels {
            if level.len() <= 1 {
                break;
            }
            let sibling = position ^ 1;
            let Some(node) = level.get(sibling).or_else(|| level.get(position)) else {
                break;
            };
            path.push(node.clone());
            position /= 2;
        }
        path
    }
}
