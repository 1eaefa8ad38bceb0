//! One-shot ballot tally engine.
//!
//! The engine runs inside a sandboxed guest: it reads a single JSON task on
//! stdin, receives the master secret through its environment, performs the
//! cryptographic computation, and writes a single JSON envelope on stdout.
//! It is stateless: nothing persists between invocations, and the secret
//! buffer is scrubbed on every exit path.
//!
//! Per-record problems (bad hex, truncated or tampered ciphertexts,
//! non-canonical plaintexts) are reclassified as dummies during counting and
//! never surface individually; only setup problems fail the run.

mod secret;
mod tally;

pub use secret::{MASTER_SECRET_VAR, MasterSecret};
pub use tally::tally_votes;

use thiserror::Error;
use types::{EngineOutput, EngineRequest, Envelope, PubkeyResult};

/// Fatal engine errors. Per-record failures never appear here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `DAO_MASTER_SECRET` absent from the environment.
    #[error("master secret is not set")]
    MasterSecretMissing,
    /// Secret present but not 64 lowercase hex characters.
    #[error("master secret is malformed")]
    MasterSecretMalformed,
    /// Malformed top-level JSON, unknown action, or missing required field.
    #[error("invalid request: {0}")]
    BadRequest(String),
    /// Key derivation exhausted its retry counters.
    #[error("key derivation failed")]
    Derivation,
    /// More ballots than the wire contract's 32-bit indices can address.
    #[error("ballot batch too large")]
    BatchTooLarge,
    /// The result failed to serialize.
    #[error("result serialization failed")]
    Serialize,
}

/// Execute a parsed request against a loaded secret.
pub fn dispatch(request: EngineRequest, secret: &MasterSecret) -> Result<EngineOutput, EngineError> {
    match request {
        EngineRequest::DerivePubkey {
            dao_account,
            user_account,
        } => {
            let keypair = crypto::derive_user_keys(secret.as_bytes(), &dao_account, &user_account)
                .map_err(|_| EngineError::Derivation)?;
            Ok(EngineOutput::Pubkey(PubkeyResult {
                pubkey: keypair.public_hex(),
            }))
        }
        EngineRequest::TallyVotes {
            dao_account,
            proposal_id,
            votes,
        } => tally::tally_votes(secret, &dao_account, proposal_id, &votes).map(EngineOutput::Tally),
    }
}

/// Parse one raw JSON task, dispatch it, and render the success envelope.
pub fn run_task(input: &str, secret: &MasterSecret) -> Result<String, EngineError> {
    let request: EngineRequest =
        serde_json::from_str(input).map_err(|err| EngineError::BadRequest(err.to_string()))?;
    let output = dispatch(request, secret)?;
    serde_json::to_string(&Envelope::success(output)).map_err(|_| EngineError::Serialize)
}

/// Full invocation path: load the secret from the environment, then run.
pub fn execute(input: &str) -> Result<String, EngineError> {
    let secret = MasterSecret::from_env()?;
    run_task(input, &secret)
}
