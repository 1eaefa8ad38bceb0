//! Shared helpers for end-to-end tests.

use anyhow::Result;
use engine::MasterSecret;
use types::{BallotRecord, TallyResult};

/// Master secret used across scenarios: 32 bytes of 0x01.
pub const MASTER_SECRET_HEX: &str =
    "0101010101010101010101010101010101010101010101010101010101010101";

/// DAO identifier used across scenarios.
pub const DAO: &str = "d";

/// Load the scenario master secret.
pub fn master_secret() -> MasterSecret {
    MasterSecret::from_hex(MASTER_SECRET_HEX).expect("valid secret hex")
}

/// Encrypt `plaintext` to the key derived for `recipient` and wrap it as a
/// record submitted by `user`.
///
/// `user` and `recipient` usually coincide; splitting them lets scenarios
/// submit ballots encrypted to the wrong voter's key.
pub fn ballot_for(
    secret: &MasterSecret,
    user: &str,
    recipient: &str,
    plaintext: &str,
    timestamp: u64,
) -> Result<BallotRecord> {
    let keypair = crypto::derive_user_keys(secret.as_bytes(), DAO, recipient)?;
    let sealed = crypto::encrypt(keypair.public(), plaintext.as_bytes())?;
    Ok(BallotRecord {
        user: user.into(),
        encrypted_vote: hex::encode(sealed),
        timestamp,
    })
}

/// Encrypt `plaintext` to `user`'s own derived key.
pub fn ballot(
    secret: &MasterSecret,
    user: &str,
    plaintext: &str,
    timestamp: u64,
) -> Result<BallotRecord> {
    ballot_for(secret, user, user, plaintext, timestamp)
}

/// Run a tally over `votes` for proposal 1.
pub fn tally(secret: &MasterSecret, votes: &[BallotRecord]) -> Result<TallyResult> {
    Ok(engine::tally_votes(secret, DAO, 1, votes)?)
}
