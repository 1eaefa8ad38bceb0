//! Browser-side companion to the tally engine.
//!
//! Encrypts ballots to a voter's published key, recomputes leaf
//! fingerprints, and checks inclusion proofs against the root the engine
//! returned. Pure byte/string transforms over owned buffers: no event
//! loop, no network, no storage.
//!
//! The voter's public key comes from the contract (populated by the
//! engine's `derive_pubkey` action); this module never sees any secret.

use wasm_bindgen::prelude::*;

/// Initialize the WASM module: panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    wasm_log::init(wasm_log::Config::default());
    log::debug!("ballot module ready");
}

/// Get the module version.
#[wasm_bindgen]
pub fn version() -> String {
    String::from(env!("CARGO_PKG_VERSION"))
}

/// Encrypt a ballot plaintext to a voter's published public key.
///
/// `recipient_pubkey_hex` is the 66-char compressed-point hex the contract
/// stores for the voter. Returns the ciphertext as lowercase hex, ready for
/// submission. Non-deterministic: every call produces a fresh ciphertext.
#[wasm_bindgen]
pub fn encrypt_ballot(recipient_pubkey_hex: &str, plaintext: &str) -> Result<String, JsValue> {
    let point = hex::decode(recipient_pubkey_hex)
        .map_err(|_| JsValue::from_str("Recipient public key must be hex"))?;
    let public = crypto::parse_public_key(&point)
        .map_err(|_| JsValue::from_str("Invalid recipient public key"))?;
    let sealed = crypto::encrypt(&public, plaintext.as_bytes())
        .map_err(|_| JsValue::from_str("Encryption failed"))?;
    Ok(hex::encode(sealed))
}

/// Recompute the leaf fingerprint for a submitted ballot.
///
/// The timestamp crosses the JS boundary as a decimal string: routing it
/// through a JS number would corrupt values above 2^53 and silently change
/// the fingerprint.
#[wasm_bindgen]
pub fn ballot_fingerprint_hex(
    voter: &str,
    timestamp_decimal: &str,
    ciphertext_hex: &str,
) -> Result<String, JsValue> {
    let timestamp: u64 = timestamp_decimal
        .parse()
        .map_err(|_| JsValue::from_str("Timestamp must be a decimal u64"))?;
    Ok(commitment::ballot_fingerprint(
        voter,
        timestamp,
        ciphertext_hex,
    ))
}

/// Check a ballot's inclusion proof against the published root.
///
/// `proof` is the engine's `proof_path` for the ballot, in order from the
/// leaf to just below the root, without side flags.
#[wasm_bindgen]
pub fn verify_ballot_inclusion(leaf_hex: &str, proof: Vec<String>, root_hex: &str) -> bool {
    commitment::verify_inclusion(leaf_hex, &proof, root_hex)
}
