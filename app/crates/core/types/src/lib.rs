//! Wire types for the voting engine boundary.
//!
//! The engine consumes exactly one JSON task on stdin and emits exactly one
//! JSON envelope on stdout. These types pin that contract: requests dispatch
//! on the `action` discriminator, unknown fields are ignored, missing
//! required fields fail the whole run, and 64-bit timestamps are carried as
//! true integers end to end.

use serde::{Deserialize, Serialize};

/// Canonical affirmative ballot plaintext.
pub const VOTE_YES: &str = "yes";

/// Canonical negative ballot plaintext.
pub const VOTE_NO: &str = "no";

/// A decrypted plaintext that matched one of the two canonical tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteChoice {
    /// The affirmative token.
    Yes,
    /// The negative token.
    No,
}

impl VoteChoice {
    /// Classify a decrypted plaintext.
    ///
    /// Anything other than the exact canonical tokens is a dummy and returns
    /// `None`; dummies keep the submission indistinguishable from a real
    /// ballot without ever contributing to the counts.
    pub fn from_plaintext(plaintext: &[u8]) -> Option<Self> {
        match plaintext {
            b if b == VOTE_YES.as_bytes() => Some(Self::Yes),
            b if b == VOTE_NO.as_bytes() => Some(Self::No),
            _ => None,
        }
    }
}

/// One submitted ballot, exactly as the contract stored it.
///
/// The historical `nonce` field still present in contract storage is not
/// declared here and is therefore ignored on input; it never participates in
/// decryption or in the leaf fingerprint.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BallotRecord {
    /// Account identifier of the submitting voter.
    pub user: String,
    /// Hybrid ciphertext of the ballot, lowercase hex.
    pub encrypted_vote: String,
    /// Contract-assigned submission timestamp in nanoseconds.
    pub timestamp: u64,
}

/// One task, dispatched on the `action` field.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EngineRequest {
    /// Recompute a voter's encryption public key.
    DerivePubkey {
        /// DAO the key is scoped to.
        dao_account: String,
        /// Voter the key is scoped to.
        user_account: String,
    },
    /// Decrypt, aggregate, and commit one full ballot batch.
    TallyVotes {
        /// DAO the ballots belong to.
        dao_account: String,
        /// Proposal the ballots were submitted for.
        proposal_id: u64,
        /// Submitted ballots in contract storage order.
        votes: Vec<BallotRecord>,
    },
}

/// Result payload of the `derive_pubkey` action.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PubkeyResult {
    /// SEC1 compressed public point, 66 lowercase hex chars.
    pub pubkey: String,
}

/// Inclusion proof for one submitted ballot.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BallotProof {
    /// Account identifier of the submitting voter.
    pub voter: String,
    /// 0-based position of the ballot in the batch.
    pub vote_index: u32,
    /// Leaf fingerprint of the ballot, 64 lowercase hex chars.
    pub vote_hash: String,
    /// Sibling fingerprints from the leaf to just below the root.
    pub proof_path: Vec<String>,
    /// Submission timestamp echoed from the input record.
    pub timestamp: u64,
}

/// Result payload of the `tally_votes` action.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TallyResult {
    /// Proposal the tally covers.
    pub proposal_id: u64,
    /// Number of voters whose final ballot was the affirmative token.
    pub yes_count: u32,
    /// Number of voters whose final ballot was the negative token.
    pub no_count: u32,
    /// `yes_count + no_count`.
    pub total_votes: u32,
    /// Root of the commitment tree over every submitted ballot.
    pub votes_merkle_root: String,
    /// One inclusion proof per submitted ballot, in batch order.
    pub merkle_proofs: Vec<BallotProof>,
    /// Attestation placeholder, `"attestation:<hex 64>"`.
    pub tee_attestation: String,
}

/// Either result payload, serialized transparently.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum EngineOutput {
    /// `derive_pubkey` result.
    Pubkey(PubkeyResult),
    /// `tally_votes` result.
    Tally(TallyResult),
}

/// The single JSON document the engine writes on stdout.
#[derive(Debug, Serialize)]
pub struct Envelope {
    /// Whether the run produced a result.
    pub success: bool,
    /// Result payload, `null` on failure.
    pub result: Option<EngineOutput>,
    /// Short human-readable failure reason, `null` on success.
    pub error: Option<String>,
}

impl Envelope {
    /// Success envelope around a result payload.
    pub fn success(result: EngineOutput) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Error envelope with a short human-readable reason.
    pub fn failure(reason: String) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(reason),
        }
    }
}
