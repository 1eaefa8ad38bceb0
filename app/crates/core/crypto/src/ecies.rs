//! Hybrid ballot encryption (ECIES over secp256k1).
//!
//! Wire format, part of the public contract with the browser client:
//!
//! ```text
//! [ephemeral_pubkey (33)] [nonce (12)] [ciphertext + tag (n + 16)]
//! ```
//!
//! The symmetric key is `HKDF-SHA-256(ikm = ephemeral_pubkey || ecdh_x,
//! salt = "", info = "")` where `ecdh_x` is the x-coordinate of the shared
//! point. Binding the ephemeral point into the key schedule ties the AEAD
//! key to this session; a transplanted ciphertext fails authentication.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use hkdf::Hkdf;
use k256::ecdh::diffie_hellman;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{COMPRESSED_PUBKEY_LEN, CryptoError};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Ciphertext bytes added on top of the plaintext length.
pub const CIPHERTEXT_OVERHEAD: usize = COMPRESSED_PUBKEY_LEN + NONCE_LEN + TAG_LEN;

/// Derive the session AEAD key from the ephemeral point and the ECDH
/// x-coordinate.
fn session_key(ephemeral_compressed: &[u8], shared_x: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut ikm = Zeroizing::new(Vec::new());
    ikm.extend_from_slice(ephemeral_compressed);
    ikm.extend_from_slice(shared_x);

    let hk = Hkdf::<Sha256>::new(None, &ikm);
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(&[], key.as_mut_slice())
        .expect("32 bytes is a valid HKDF-SHA-256 output length");
    key
}

/// Encrypt a ballot plaintext to a voter's public key (client side).
///
/// Non-deterministic: every call draws a fresh ephemeral scalar and a fresh
/// nonce, so two encryptions of the same plaintext differ everywhere.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let ephemeral = SecretKey::random(&mut OsRng);
    let ephemeral_point = ephemeral.public_key().to_encoded_point(true);

    let shared = diffie_hellman(ephemeral.to_nonzero_scalar(), recipient.as_affine());
    let key = session_key(ephemeral_point.as_bytes(), shared.raw_secret_bytes().as_slice());
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    let capacity = plaintext
        .len()
        .checked_add(CIPHERTEXT_OVERHEAD)
        .ok_or(CryptoError::Encrypt)?;
    let mut out = Vec::with_capacity(capacity);
    out.extend_from_slice(ephemeral_point.as_bytes());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt a ballot ciphertext with a voter's secret key (engine side).
///
/// Every failure collapses into [`CryptoError::Decrypt`]; callers treat the
/// record as not carrying a valid plaintext and must not surface the cause.
pub fn decrypt(secret: &SecretKey, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if ciphertext.len() < CIPHERTEXT_OVERHEAD {
        return Err(CryptoError::Decrypt);
    }
    let (point_bytes, rest) = ciphertext.split_at(COMPRESSED_PUBKEY_LEN);
    let (nonce, sealed) = rest.split_at(NONCE_LEN);

    let ephemeral = PublicKey::from_sec1_bytes(point_bytes).map_err(|_| CryptoError::Decrypt)?;
    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
    let key = session_key(point_bytes, shared.raw_secret_bytes().as_slice());
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));

    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Decrypt)
}
