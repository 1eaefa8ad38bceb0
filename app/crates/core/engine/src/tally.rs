//! Ballot aggregation and commitment.
//!
//! One pass decrypts and reduces per voter, a second pass fingerprints every
//! submission for the tree. The two passes deliberately disagree on what
//! they cover: counting only sees canonical plaintexts, the tree commits to
//! the full submitted batch.

use std::collections::BTreeMap;

use commitment::{BallotTree, ballot_fingerprint, hex_sha256};
use crypto::UserKeypair;
use types::{BallotProof, BallotRecord, TallyResult, VoteChoice};

use crate::{EngineError, MasterSecret};

/// Aggregate one submitted batch into counts, root, and proofs.
///
/// Input order is authoritative: records are never sorted, deduplicated, or
/// permuted, and the proof list is ordered identically to the input batch.
pub fn tally_votes(
    secret: &MasterSecret,
    dao_account: &str,
    proposal_id: u64,
    votes: &[BallotRecord],
) -> Result<TallyResult, EngineError> {
    // Decrypt pass and per-voter reduction, in submission order. "Latest
    // wins" is strict: an exact timestamp tie keeps the earlier record.
    let mut keys: BTreeMap<&str, UserKeypair> = BTreeMap::new();
    let mut chosen: BTreeMap<&str, (VoteChoice, u64)> = BTreeMap::new();
    for ballot in votes {
        let Some(choice) = decrypt_choice(secret, dao_account, ballot, &mut keys) else {
            continue;
        };
        let newer = chosen
            .get(ballot.user.as_str())
            .is_none_or(|(_, held)| ballot.timestamp > *held);
        if newer {
            chosen.insert(ballot.user.as_str(), (choice, ballot.timestamp));
        }
    }

    let yes_count = count_of(&chosen, VoteChoice::Yes)?;
    let no_count = count_of(&chosen, VoteChoice::No)?;
    let total_votes = yes_count
        .checked_add(no_count)
        .ok_or(EngineError::BatchTooLarge)?;

    // Leaf pass covers every submission, counted or not.
    let leaves: Vec<String> = votes
        .iter()
        .map(|ballot| ballot_fingerprint(&ballot.user, ballot.timestamp, &ballot.encrypted_vote))
        .collect();
    let tree = BallotTree::build(leaves.clone());
    let votes_merkle_root = tree.root();

    let mut merkle_proofs = Vec::with_capacity(votes.len());
    for ((index, ballot), vote_hash) in votes.iter().enumerate().zip(leaves) {
        let vote_index = u32::try_from(index).map_err(|_| EngineError::BatchTooLarge)?;
        merkle_proofs.push(BallotProof {
            voter: ballot.user.clone(),
            vote_index,
            vote_hash,
            proof_path: tree.proof(index),
            timestamp: ballot.timestamp,
        });
    }

    let tee_attestation = attestation(proposal_id, &votes_merkle_root, yes_count, no_count);

    log::info!(
        "tallied {} submissions, {} counted",
        votes.len(),
        total_votes
    );

    Ok(TallyResult {
        proposal_id,
        yes_count,
        no_count,
        total_votes,
        votes_merkle_root,
        merkle_proofs,
        tee_attestation,
    })
}

/// Decrypt one ballot and classify its plaintext.
///
/// Every failure (bad hex, truncated ciphertext, failed authentication,
/// non-canonical plaintext) yields `None`. The reason is never recorded
/// anywhere, so decryption outcomes cannot be used as an oracle.
fn decrypt_choice<'a>(
    secret: &MasterSecret,
    dao_account: &str,
    ballot: &'a BallotRecord,
    keys: &mut BTreeMap<&'a str, UserKeypair>,
) -> Option<VoteChoice> {
    if !keys.contains_key(ballot.user.as_str()) {
        let keypair = crypto::derive_user_keys(secret.as_bytes(), dao_account, &ballot.user).ok()?;
        keys.insert(ballot.user.as_str(), keypair);
    }
    let keypair = keys.get(ballot.user.as_str())?;
    let ciphertext = hex::decode(&ballot.encrypted_vote).ok()?;
    let plaintext = crypto::decrypt(keypair.secret(), &ciphertext).ok()?;
    VoteChoice::from_plaintext(&plaintext)
}

fn count_of(
    chosen: &BTreeMap<&str, (VoteChoice, u64)>,
    which: VoteChoice,
) -> Result<u32, EngineError> {
    let count = chosen
        .values()
        .filter(|(choice, _)| *choice == which)
        .count();
    u32::try_from(count).map_err(|_| EngineError::BatchTooLarge)
}

/// Placeholder for the hardware attestation. The `"attestation:<hex>"` shape
/// is fixed so consumers survive the upgrade to real attestation material.
fn attestation(proposal_id: u64, root: &str, yes_count: u32, no_count: u32) -> String {
    let body = format!("{proposal_id}:{root}:{yes_count}:{no_count}");
    format!("attestation:{}", hex_sha256(body.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAO: &str = "d";

    fn secret() -> MasterSecret {
        MasterSecret::from_hex(&"01".repeat(32)).expect("valid secret")
    }

    fn ballot(secret: &MasterSecret, user: &str, plaintext: &str, timestamp: u64) -> BallotRecord {
        let keypair = crypto::derive_user_keys(secret.as_bytes(), DAO, user).expect("derive");
        let sealed = crypto::encrypt(keypair.public(), plaintext.as_bytes()).expect("encrypt");
        BallotRecord {
            user: user.into(),
            encrypted_vote: hex::encode(sealed),
            timestamp,
        }
    }

    #[test]
    fn latest_wins_uses_strict_greater() {
        let secret = secret();
        let votes = vec![
            ballot(&secret, "alice", "yes", 10),
            ballot(&secret, "alice", "no", 10),
        ];
        let result = tally_votes(&secret, DAO, 1, &votes).expect("tally");
        // Exact tie keeps the earlier record.
        assert_eq!(result.yes_count, 1);
        assert_eq!(result.no_count, 0);
        assert_eq!(result.total_votes, 1);
    }

    #[test]
    fn latest_wins_is_order_independent() {
        let secret = secret();
        let early = ballot(&secret, "alice", "yes", 10);
        let late = ballot(&secret, "alice", "no", 20);

        let straight =
            tally_votes(&secret, DAO, 1, &[early.clone(), late.clone()]).expect("tally");
        let swapped = tally_votes(&secret, DAO, 1, &[late, early]).expect("tally");

        assert_eq!(straight.no_count, 1);
        assert_eq!(swapped.no_count, 1);
        assert_eq!(straight.yes_count, 0);
        assert_eq!(swapped.yes_count, 0);
    }

    #[test]
    fn dummy_ballots_still_get_leaves() {
        let secret = secret();
        let votes = vec![
            ballot(&secret, "alice", "DUMMY_a", 10),
            ballot(&secret, "bob", "DUMMY_b", 20),
        ];
        let result = tally_votes(&secret, DAO, 1, &votes).expect("tally");
        assert_eq!(result.total_votes, 0);
        assert_eq!(result.merkle_proofs.len(), 2);
        assert_ne!(result.votes_merkle_root, commitment::empty_root());
    }

    #[test]
    fn garbage_ciphertext_is_a_dummy_with_a_leaf() {
        let secret = secret();
        let votes = vec![
            BallotRecord {
                user: "alice".into(),
                encrypted_vote: "not-hex".into(),
                timestamp: 10,
            },
            BallotRecord {
                user: "bob".into(),
                encrypted_vote: "00ff".into(),
                timestamp: 20,
            },
        ];
        let result = tally_votes(&secret, DAO, 1, &votes).expect("tally");
        assert_eq!(result.total_votes, 0);
        assert_eq!(result.merkle_proofs.len(), 2);
        // The leaf covers the submitted hex exactly, decodable or not.
        assert_eq!(
            result.merkle_proofs[0].vote_hash,
            ballot_fingerprint("alice", 10, "not-hex")
        );
    }

    #[test]
    fn proofs_mirror_batch_order() {
        let secret = secret();
        let votes = vec![
            ballot(&secret, "carol", "yes", 30),
            ballot(&secret, "alice", "yes", 10),
            ballot(&secret, "bob", "no", 20),
        ];
        let result = tally_votes(&secret, DAO, 1, &votes).expect("tally");
        let voters: Vec<&str> = result
            .merkle_proofs
            .iter()
            .map(|proof| proof.voter.as_str())
            .collect();
        assert_eq!(voters, ["carol", "alice", "bob"]);
        for (index, proof) in result.merkle_proofs.iter().enumerate() {
            assert_eq!(usize::try_from(proof.vote_index).expect("fits"), index);
        }
    }

    #[test]
    fn attestation_binds_proposal_root_and_counts() {
        let secret = secret();
        let votes = vec![ballot(&secret, "alice", "yes", 10)];
        let result = tally_votes(&secret, DAO, 42, &votes).expect("tally");
        let expected_body = format!("42:{}:1:0", result.votes_merkle_root);
        assert_eq!(
            result.tee_attestation,
            format!("attestation:{}", hex_sha256(expected_body.as_bytes()))
        );
    }

    #[test]
    fn counts_never_exceed_distinct_voters() {
        let secret = secret();
        let votes = vec![
            ballot(&secret, "alice", "yes", 10),
            ballot(&secret, "alice", "yes", 20),
            ballot(&secret, "alice", "no", 30),
            ballot(&secret, "bob", "no", 40),
        ];
        let result = tally_votes(&secret, DAO, 1, &votes).expect("tally");
        assert_eq!(result.yes_count, 0);
        assert_eq!(result.no_count, 2);
        assert_eq!(result.total_votes, 2);
        assert_eq!(result.merkle_proofs.len(), 4);
    }
}
