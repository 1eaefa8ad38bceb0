//! Per-user key derivation and hybrid ballot encryption.
//!
//! Two primitives, both deterministic consumers of library crypto rather
//! than reimplementations:
//!
//! 1. **Key derivation**: one master secret plus a DAO and voter identifier
//!    yields a secp256k1 keypair via HKDF-SHA-256. Voters never hold the
//!    scalar; the engine recomputes it on demand.
//! 2. **Hybrid encryption**: ECIES over the same curve (ephemeral ECDH,
//!    HKDF-SHA-256 key schedule, AES-256-GCM). The browser encrypts, the
//!    engine decrypts.
//!
//! The compressed-point sizes and the ciphertext layout are part of the wire
//! contract shared with the browser client; see [`ecies`] for the layout.

mod ecies;
mod keys;

pub use ecies::{CIPHERTEXT_OVERHEAD, decrypt, encrypt};
pub use k256::{PublicKey, SecretKey};
pub use keys::{COMPRESSED_PUBKEY_LEN, MASTER_SECRET_LEN, UserKeypair, derive_user_keys};

use thiserror::Error;

/// Errors produced by the key-derivation and encryption primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The derived scalar fell outside the curve order for every retry
    /// counter. Requires ~2^128 HKDF collisions to reach.
    #[error("key derivation exhausted retry counters")]
    DerivationExhausted,
    /// A public key was not a valid SEC1 compressed curve point.
    #[error("invalid public key encoding")]
    InvalidPublicKey,
    /// The AEAD refused to seal the plaintext.
    #[error("encryption failed")]
    Encrypt,
    /// Authenticated decryption failed. Deliberately carries no cause:
    /// truncation, a bad point, a bad tag, and a wrong recipient are all
    /// indistinguishable to the caller.
    #[error("authentication failed")]
    Decrypt,
}

/// Parse a public key from its SEC1 compressed encoding.
pub fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    if bytes.len() != COMPRESSED_PUBKEY_LEN {
        return Err(CryptoError::InvalidPublicKey);
    }
    PublicKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)
}
