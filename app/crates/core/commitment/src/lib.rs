//! Ballot commitment layer.
//!
//! Fingerprints every submitted ballot, folds the fingerprints into a binary
//! SHA-256 tree, and checks inclusion proofs against a published root. The
//! tree commits to what was *submitted*, not what was counted: records that
//! fail decryption still get a leaf.
//!
//! Two encoding decisions are wire contract, shared byte-for-byte with the
//! browser client: the leaf preimage serializes the timestamp as 8
//! little-endian bytes, and a parent node hashes the *hex text* of its two
//! children rather than their raw digests.

mod tree;
mod verify;

pub use tree::BallotTree;
pub use verify::verify_inclusion;

use sha2::{Digest, Sha256};

/// Hex length of a SHA-256 fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn hex_sha256(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fingerprint of one submitted ballot.
///
/// `sha256(utf8(voter) || le64(timestamp) || utf8(ciphertext_hex))`, rendered
/// as lowercase hex. The ciphertext hex enters the preimage exactly as
/// submitted.
pub fn ballot_fingerprint(voter: &str, timestamp: u64, ciphertext_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(voter.as_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.update(ciphertext_hex.as_bytes());
    hex::encode(hasher.finalize())
}

/// Root of the empty batch: SHA-256 of the empty string.
pub fn empty_root() -> String {
    hex_sha256(b"")
}

/// Parent of two sibling nodes: SHA-256 over the children's hex text.
pub(crate) fn parent(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hex::encode(hasher.finalize())
}
