//! Flag-free inclusion verification.

use crate::parent;

/// Check that `leaf` is committed under `root` via the sibling path `proof`.
///
/// Proofs carry no left/right flags, so both child orders are tried at every
/// step. Worst-case work is `O(2^depth)`, which stays tractable well past
/// ten thousand ballots; the common case short-circuits on the first
/// matching order.
pub fn verify_inclusion(leaf: &str, proof: &[String], root: &str) -> bool {
    match proof.split_first() {
        None => leaf == root,
        Some((sibling, rest)) => {
            verify_inclusion(&parent(leaf, sibling), rest, root)
                || verify_inclusion(&parent(sibling, leaf), rest, root)
        }
    }
}
