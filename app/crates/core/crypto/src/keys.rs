//! Deterministic per-user key derivation.
//!
//! ```text
//! master secret (32 bytes)
//!        │
//!        └── HKDF-SHA-256, info = "user:<dao_id>:<user_id>"
//!                   │
//!                   └── secp256k1 scalar → compressed public point (33 bytes)
//! ```
//!
//! The HKDF output is interpreted as a big-endian scalar. An output of zero
//! or at or above the curve order is rejected and the derivation retries
//! with a single counter byte appended to the info string, starting at
//! 0x01. The retry path keeps the derivation total and deterministic.

use hkdf::Hkdf;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::CryptoError;

/// Length of the master secret in bytes.
pub const MASTER_SECRET_LEN: usize = 32;

/// Length of a SEC1 compressed secp256k1 public point.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// A voter's derived encryption keypair.
///
/// Recomputed on demand, never stored. The secret scalar zeroizes on drop.
pub struct UserKeypair {
    secret: SecretKey,
    public: PublicKey,
}

impl UserKeypair {
    /// The secret scalar.
    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// The public point.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// SEC1 compressed encoding of the public point.
    pub fn public_compressed(&self) -> [u8; COMPRESSED_PUBKEY_LEN] {
        let point = self.public.to_encoded_point(true);
        let mut bytes = [0u8; COMPRESSED_PUBKEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }

    /// Lowercase hex of the compressed public point, 66 chars.
    pub fn public_hex(&self) -> String {
        hex::encode(self.public_compressed())
    }
}

/// Derive a voter's keypair from the master secret.
///
/// Identical inputs yield a bit-identical public point on every call.
pub fn derive_user_keys(
    master_secret: &[u8; MASTER_SECRET_LEN],
    dao_id: &str,
    user_id: &str,
) -> Result<UserKeypair, CryptoError> {
    let hk = Hkdf::<Sha256>::new(None, master_secret);

    let mut info = Vec::new();
    info.extend_from_slice(b"user:");
    info.extend_from_slice(dao_id.as_bytes());
    info.push(b':');
    info.extend_from_slice(user_id.as_bytes());

    if let Some(keypair) = expand_to_keypair(&hk, &info) {
        return Ok(keypair);
    }
    for counter in 1..=u8::MAX {
        info.push(counter);
        let keypair = expand_to_keypair(&hk, &info);
        info.pop();
        if let Some(keypair) = keypair {
            return Ok(keypair);
        }
    }
    Err(CryptoError::DerivationExhausted)
}

/// One HKDF expansion attempt; `None` when the output is not a valid scalar.
fn expand_to_keypair(hk: &Hkdf<Sha256>, info: &[u8]) -> Option<UserKeypair> {
    let mut okm = Zeroizing::new([0u8; MASTER_SECRET_LEN]);
    hk.expand(info, okm.as_mut_slice())
        .expect("32 bytes is a valid HKDF-SHA-256 output length");
    let secret = SecretKey::from_slice(okm.as_slice()).ok()?;
    let public = secret.public_key();
    Some(UserKeypair { secret, public })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: [u8; MASTER_SECRET_LEN] = [0x01; MASTER_SECRET_LEN];

    #[test]
    fn derivation_is_deterministic() {
        let first = derive_user_keys(&MASTER, "d", "alice").expect("derive");
        let second = derive_user_keys(&MASTER, "d", "alice").expect("derive");
        assert_eq!(first.public_compressed(), second.public_compressed());
        assert_eq!(
            first.secret().to_bytes().as_slice(),
            second.secret().to_bytes().as_slice()
        );
    }

    #[test]
    fn users_are_isolated() {
        let alice = derive_user_keys(&MASTER, "d", "alice").expect("derive");
        let bob = derive_user_keys(&MASTER, "d", "bob").expect("derive");
        assert_ne!(alice.public_compressed(), bob.public_compressed());
    }

    #[test]
    fn daos_are_isolated() {
        let a = derive_user_keys(&MASTER, "dao-a", "alice").expect("derive");
        let b = derive_user_keys(&MASTER, "dao-b", "alice").expect("derive");
        assert_ne!(a.public_compressed(), b.public_compressed());
    }

    #[test]
    fn master_secrets_are_isolated() {
        let other = [0x02; MASTER_SECRET_LEN];
        let a = derive_user_keys(&MASTER, "d", "alice").expect("derive");
        let b = derive_user_keys(&other, "d", "alice").expect("derive");
        assert_ne!(a.public_compressed(), b.public_compressed());
    }

    #[test]
    fn public_hex_is_66_lowercase_chars() {
        let keypair = derive_user_keys(&MASTER, "d", "alice").expect("derive");
        let hex = keypair.public_hex();
        assert_eq!(hex.len(), 66);
        assert!(hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        // SEC1 compressed points start with 0x02 or 0x03.
        assert!(hex.starts_with("02") || hex.starts_with("03"));
    }

    #[test]
    fn colon_in_user_id_still_derives() {
        // "user:d:a:b" is a valid info string even though it embeds the
        // separator; the engine treats identifiers as opaque UTF-8.
        let keypair = derive_user_keys(&MASTER, "d", "a:b").expect("derive");
        assert_eq!(keypair.public_compressed().len(), COMPRESSED_PUBKEY_LEN);
    }
}
